//! Route definitions for the `/surveys` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::survey;
use crate::state::AppState;

/// Routes mounted at `/surveys`.
///
/// ```text
/// GET    /                               -> list
/// POST   /                               -> create
/// GET    /{id}                           -> get_by_id
/// PUT    /{id}                           -> update (creator only)
/// DELETE /{id}                           -> delete (creator only)
/// GET    /location/{lat}/{lng}/{radius}  -> list_by_location
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(survey::list).post(survey::create))
        .route(
            "/{id}",
            get(survey::get_by_id)
                .put(survey::update)
                .delete(survey::delete),
        )
        .route(
            "/location/{lat}/{lng}/{radius}",
            get(survey::list_by_location),
        )
}
