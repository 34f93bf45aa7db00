//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /preferences   -> get_preferences
/// PUT    /preferences   -> update_preferences
/// GET    /history       -> history
/// POST   /email         -> send_email
/// POST   /sms           -> send_sms
/// POST   /check-levels  -> check_levels
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/preferences",
            get(notification::get_preferences).put(notification::update_preferences),
        )
        .route("/history", get(notification::history))
        .route("/email", post(notification::send_email))
        .route("/sms", post(notification::send_sms))
        .route("/check-levels", post(notification::check_levels))
}
