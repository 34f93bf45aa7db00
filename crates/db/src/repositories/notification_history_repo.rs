//! Repository for the append-only `notification_history` table.

use aquasurveyor_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification_history::{CreateNotificationHistory, NotificationHistory};

/// Column list for `notification_history` queries.
const COLUMNS: &str = "id, user_id, channel, subject, message, status, error, \
    survey_id, alert_type, threshold, created_at";

/// Append and read delivery attempts. There is deliberately no update or delete.
pub struct NotificationHistoryRepo;

impl NotificationHistoryRepo {
    /// Record one delivery attempt.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotificationHistory,
    ) -> Result<NotificationHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_history
                (user_id, channel, subject, message, status, error, survey_id, alert_type, threshold)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let metadata = input.metadata;
        sqlx::query_as::<_, NotificationHistory>(&query)
            .bind(input.user_id)
            .bind(input.channel)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(input.status)
            .bind(&input.error)
            .bind(metadata.map(|m| m.survey_id))
            .bind(metadata.map(|m| m.alert_type.as_str()))
            .bind(metadata.map(|m| m.threshold.as_str()))
            .fetch_one(pool)
            .await
    }

    /// List a user's most recent attempts, newest first.
    pub async fn list_recent_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<NotificationHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_history
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, NotificationHistory>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
