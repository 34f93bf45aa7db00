//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use aquasurveyor_core::error::CoreError;
use aquasurveyor_core::thresholds::{evaluate, ThresholdAlert};
use aquasurveyor_core::types::DbId;
use aquasurveyor_db::models::notification_history::NotificationHistory;
use aquasurveyor_db::models::notification_preferences::{
    NotificationPreferences, UpdateNotificationPreferences,
};
use aquasurveyor_db::repositories::{
    NotificationHistoryRepo, NotificationPreferencesRepo, SurveyRepo, UserRepo,
};
use aquasurveyor_notify::{AlertRecipient, OutgoingEmail, OutgoingSms};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Number of history entries returned by `GET /notifications/history`.
const HISTORY_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /notifications/email`.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// Request body for `POST /notifications/sms`.
#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    pub to: String,
    pub message: String,
}

/// Request body for `POST /notifications/check-levels`.
#[derive(Debug, Deserialize)]
pub struct CheckLevelsRequest {
    pub survey_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct CheckLevelsResponse {
    pub alerts: Vec<ThresholdAlert>,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/preferences
///
/// Creates the default record on first access.
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<NotificationPreferences>>> {
    let prefs = NotificationPreferencesRepo::get_or_create(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(prefs)))
}

/// PUT /api/v1/notifications/preferences
///
/// Merges the supplied fields into the stored record. 404 if the user has
/// never fetched (and thereby created) their preferences.
pub async fn update_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateNotificationPreferences>,
) -> AppResult<Json<DataResponse<NotificationPreferences>>> {
    input.validate()?;

    let prefs = NotificationPreferencesRepo::update(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NotificationPreferences",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse::new(prefs)))
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/history
pub async fn history(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<NotificationHistory>>>> {
    let entries =
        NotificationHistoryRepo::list_recent_for_user(&state.pool, auth.user_id, HISTORY_LIMIT)
            .await?;
    Ok(Json(DataResponse::new(entries)))
}

// ---------------------------------------------------------------------------
// Ad-hoc sends
// ---------------------------------------------------------------------------

/// POST /api/v1/notifications/email
///
/// The attempt is recorded whether or not delivery succeeds; a failed
/// delivery then surfaces as 502.
pub async fn send_email(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SendEmailRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    let email = OutgoingEmail {
        to: input.to,
        subject: input.subject,
        text: input.text,
        html: input.html,
    };
    state.dispatcher.send_email(auth.user_id, &email).await?;
    Ok(Json(DataResponse::new(MessageResponse {
        message: "Email sent successfully",
    })))
}

/// POST /api/v1/notifications/sms
pub async fn send_sms(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SendSmsRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    let sms = OutgoingSms {
        to: input.to,
        body: input.message,
    };
    state.dispatcher.send_sms(auth.user_id, &sms).await?;
    Ok(Json(DataResponse::new(MessageResponse {
        message: "SMS sent successfully",
    })))
}

// ---------------------------------------------------------------------------
// Threshold check
// ---------------------------------------------------------------------------

/// POST /api/v1/notifications/check-levels
///
/// Evaluates the survey against its creator's preferences and notifies the
/// creator on their enabled channels. Delivery failures are recorded in
/// history and do not fail the request.
pub async fn check_levels(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CheckLevelsRequest>,
) -> AppResult<Json<DataResponse<CheckLevelsResponse>>> {
    let survey = SurveyRepo::find_by_id(&state.pool, input.survey_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Survey",
            id: input.survey_id,
        }))?;

    let owner_id = survey.created_by;
    let prefs = NotificationPreferencesRepo::find_by_user(&state.pool, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NotificationPreferences",
            id: owner_id,
        }))?;
    let owner = UserRepo::find_by_id(&state.pool, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: owner_id,
        }))?;

    let alerts = evaluate(&survey.readings(), &prefs.alert_settings());
    tracing::debug!(
        survey_id = survey.id,
        alert_count = alerts.len(),
        "Evaluated survey thresholds"
    );

    let recipient = AlertRecipient {
        user_id: owner.id,
        email: owner.email,
        phone_number: owner.phone_number,
    };
    state
        .dispatcher
        .dispatch_alerts(&recipient, &survey, prefs.channel_settings(), &alerts)
        .await?;

    Ok(Json(DataResponse::new(CheckLevelsResponse { alerts })))
}
