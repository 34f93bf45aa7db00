use aquasurveyor_db::models::notification_history::{
    CreateNotificationHistory, NotificationHistory,
};
use aquasurveyor_db::repositories::NotificationHistoryRepo;
use aquasurveyor_db::DbPool;
use async_trait::async_trait;

use crate::channel::HistorySink;
use crate::error::NotifyError;

/// Writes delivery attempts to the `notification_history` table.
#[derive(Clone)]
pub struct PgHistorySink {
    pool: DbPool,
}

impl PgHistorySink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistorySink for PgHistorySink {
    async fn record(
        &self,
        entry: CreateNotificationHistory,
    ) -> Result<NotificationHistory, NotifyError> {
        Ok(NotificationHistoryRepo::create(&self.pool, &entry).await?)
    }
}
