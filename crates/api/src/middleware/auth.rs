//! Bearer-token authentication for protected routes.

use aquasurveyor_core::error::CoreError;
use aquasurveyor_core::types::DbId;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// The caller, as identified by a valid access token.
///
/// Taking `AuthUser` as a handler argument makes the route require
/// `Authorization: Bearer <jwt>`; anything else is a 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
}

fn unauthorized(message: impl Into<String>) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

/// The token part of the `Authorization` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Authentication required"))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Authorization header must be 'Bearer <token>'"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state.config.jwt.verify(token).map_err(|e| {
            tracing::debug!(error = ?e, "Rejected access token");
            unauthorized(e.to_string())
        })?;

        Ok(Self {
            user_id: claims.sub,
        })
    }
}
