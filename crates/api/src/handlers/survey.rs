//! Handlers for the `/surveys` resource.
//!
//! Reads are open to any authenticated user; updates and deletes are
//! restricted to the survey's creator.

use aquasurveyor_core::error::CoreError;
use aquasurveyor_core::geo::{radius_km_to_meters, validate_coordinates};
use aquasurveyor_core::types::DbId;
use aquasurveyor_db::models::survey::{CreateSurvey, Survey, UpdateSurvey};
use aquasurveyor_db::repositories::SurveyRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// GET /api/v1/surveys
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Survey>>>> {
    let surveys = SurveyRepo::list_with_creators(&state.pool).await?;
    Ok(Json(DataResponse::new(surveys)))
}

/// GET /api/v1/surveys/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Survey>>> {
    let survey = SurveyRepo::find_with_creator(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse::new(survey)))
}

/// POST /api/v1/surveys
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateSurvey>,
) -> AppResult<(StatusCode, Json<DataResponse<Survey>>)> {
    let survey = SurveyRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(survey_id = survey.id, user_id = auth.user_id, "Survey created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(survey))))
}

/// PUT /api/v1/surveys/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateSurvey>,
) -> AppResult<Json<DataResponse<Survey>>> {
    ensure_owner(&state, id, auth.user_id, "update").await?;

    let survey = SurveyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse::new(survey)))
}

/// DELETE /api/v1/surveys/{id}
///
/// Notification history referencing the survey is left in place.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    ensure_owner(&state, id, auth.user_id, "delete").await?;

    if !SurveyRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(survey_id = id, user_id = auth.user_id, "Survey deleted");
    Ok(Json(DataResponse::new(MessageResponse {
        message: "Survey deleted",
    })))
}

/// GET /api/v1/surveys/location/{lat}/{lng}/{radius}
///
/// `radius` is in kilometres. Results are ordered nearest first.
pub async fn list_by_location(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath((lat, lng, radius_km)): AppPath<(f64, f64, f64)>,
) -> AppResult<Json<DataResponse<Vec<Survey>>>> {
    validate_coordinates(lat, lng)?;
    let radius_meters = radius_km_to_meters(radius_km)?;

    let surveys = SurveyRepo::list_within_radius(&state.pool, lat, lng, radius_meters).await?;
    Ok(Json(DataResponse::new(surveys)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Survey",
        id,
    })
}

/// 404 when the survey is missing, 403 when `user_id` did not create it.
async fn ensure_owner(
    state: &AppState,
    id: DbId,
    user_id: DbId,
    action: &str,
) -> AppResult<()> {
    let survey = SurveyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    if survey.created_by != user_id {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Not authorized to {action} this survey"
        ))));
    }
    Ok(())
}
