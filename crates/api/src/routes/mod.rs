pub mod auth;
pub mod health;
pub mod notification;
pub mod survey;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                          register (public)
/// /auth/login                             login (public)
/// /auth/me                                current user
///
/// /surveys                                list, create
/// /surveys/{id}                           get, update, delete
/// /surveys/location/{lat}/{lng}/{radius}  proximity search (km)
///
/// /notifications/preferences              get-or-create, update
/// /notifications/history                  newest attempts
/// /notifications/email                    ad-hoc email
/// /notifications/sms                      ad-hoc SMS
/// /notifications/check-levels             evaluate a survey and alert
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/surveys", survey::router())
        .nest("/notifications", notification::router())
}
