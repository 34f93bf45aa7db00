//! HTTP error mapping.
//!
//! Handler failures and handler panics leave the server as
//! `{ "error": <message>, "code": <CODE> }`. A request timeout is the one
//! exception: it answers 408 with an empty body.

use std::any::Any;

use aquasurveyor_core::error::CoreError;
use aquasurveyor_notify::NotifyError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Message returned for every 500; details only go to the log.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for `check_violation`.
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An email or SMS provider rejected the message or could not be reached.
    #[error("Delivery failed: {0}")]
    Delivery(NotifyError),

    /// The body was not valid JSON for the target type, or was too large.
    #[error(transparent)]
    Json(#[from] JsonRejection),

    /// A path segment did not parse, e.g. a non-numeric id.
    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        match err {
            // A failed history write is our storage, not the provider.
            NotifyError::History(db) => AppError::Database(db),
            other => AppError::Delivery(other),
        }
    }
}

type ErrorParts = (StatusCode, &'static str, String);

fn internal(detail: &dyn std::fmt::Display) -> ErrorParts {
    tracing::error!(error = %detail, "Request failed with an internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Delivery(err) => {
                tracing::warn!(error = %err, "Notification delivery failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "DELIVERY_FAILED",
                    "The notification could not be delivered".to_string(),
                )
            }
            AppError::Json(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                rejection.body_text(),
            ),
            // Syntax errors, wrong content type, and missing or mistyped
            // fields are all a 400 here.
            AppError::Json(rejection) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text())
            }
            AppError::Path(rejection) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        }
    }
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

/// Response for a panicking handler, installed on the `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    AppError::InternalError(format!("handler panicked: {detail}")).into_response()
}

/// Map database failures by SQLSTATE and constraint-name prefix.
///
/// `uq_*` unique violations are 409 and `ck_*` check violations are 400.
/// A missing row is 404. Anything else is an opaque 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => return internal(other),
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        Some(CHECK_VIOLATION) if constraint.starts_with("ck_") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value violates check constraint: {constraint}"),
        ),
        _ => internal(db_err),
    }
}
