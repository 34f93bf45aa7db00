//! Repository for the `notification_preferences` table.

use aquasurveyor_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification_preferences::{
    NotificationPreferences, NotificationPreferencesRow, UpdateNotificationPreferences,
};

/// Column list for `notification_preferences` queries.
const COLUMNS: &str = "id, user_id, email_notifications, sms_notifications, \
    notify_water_level, notify_ph, notify_dissolved_oxygen, notify_temperature, \
    notify_pollution, water_level_min, water_level_max, ph_min, ph_max, \
    dissolved_oxygen_min, dissolved_oxygen_max, created_at, updated_at";

/// Provides get-or-create and partial update for per-user preferences.
pub struct NotificationPreferencesRepo;

impl NotificationPreferencesRepo {
    /// Get the preference record for a user, if one exists.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NotificationPreferences>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_preferences WHERE user_id = $1");
        let row = sqlx::query_as::<_, NotificationPreferencesRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(NotificationPreferences::from))
    }

    /// Get the user's record, inserting one with column defaults first if absent.
    ///
    /// `ON CONFLICT (user_id) DO NOTHING` makes concurrent first calls converge
    /// on a single row.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<NotificationPreferences, sqlx::Error> {
        let inserted = sqlx::query(
            "INSERT INTO notification_preferences (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            tracing::debug!(user_id, "Created default notification preferences");
        }

        let query = format!("SELECT {COLUMNS} FROM notification_preferences WHERE user_id = $1");
        let row = sqlx::query_as::<_, NotificationPreferencesRow>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Apply a partial update in a single statement.
    ///
    /// Uses `COALESCE` to only overwrite fields that are `Some` in the input.
    /// The `ck_notification_preferences_*` constraints re-check `min <= max`
    /// on the merged row. Returns `None` if the user has no record.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateNotificationPreferences,
    ) -> Result<Option<NotificationPreferences>, sqlx::Error> {
        let types = input.notification_types.clone().unwrap_or_default();
        let thresholds = input.thresholds.clone().unwrap_or_default();
        let water_level = thresholds.water_level.unwrap_or_default();
        let ph = thresholds.ph.unwrap_or_default();
        let dissolved_oxygen = thresholds.dissolved_oxygen.unwrap_or_default();

        let query = format!(
            "UPDATE notification_preferences SET
                email_notifications = COALESCE($2, email_notifications),
                sms_notifications = COALESCE($3, sms_notifications),
                notify_water_level = COALESCE($4, notify_water_level),
                notify_ph = COALESCE($5, notify_ph),
                notify_dissolved_oxygen = COALESCE($6, notify_dissolved_oxygen),
                notify_temperature = COALESCE($7, notify_temperature),
                notify_pollution = COALESCE($8, notify_pollution),
                water_level_min = COALESCE($9, water_level_min),
                water_level_max = COALESCE($10, water_level_max),
                ph_min = COALESCE($11, ph_min),
                ph_max = COALESCE($12, ph_max),
                dissolved_oxygen_min = COALESCE($13, dissolved_oxygen_min),
                dissolved_oxygen_max = COALESCE($14, dissolved_oxygen_max),
                updated_at = NOW()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, NotificationPreferencesRow>(&query)
            .bind(user_id)
            .bind(input.email_notifications)
            .bind(input.sms_notifications)
            .bind(types.water_level)
            .bind(types.ph)
            .bind(types.dissolved_oxygen)
            .bind(types.temperature)
            .bind(types.pollution)
            .bind(water_level.min)
            .bind(water_level.max)
            .bind(ph.min)
            .bind(ph.max)
            .bind(dissolved_oxygen.min)
            .bind(dissolved_oxygen.max)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(NotificationPreferences::from))
    }
}
