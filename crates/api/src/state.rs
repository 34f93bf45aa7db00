use std::sync::Arc;

use aquasurveyor_notify::NotificationDispatcher;

use crate::config::ServerConfig;

/// Handler state. Cloned per request; every field is a handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: aquasurveyor_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Email/SMS delivery with history recording.
    pub dispatcher: NotificationDispatcher,
}
