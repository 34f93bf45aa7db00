//! Notification preference model and DTOs.

use aquasurveyor_core::error::CoreError;
use aquasurveyor_core::preferences::{
    AlertSettings, ChannelSettings, NotificationTypes, NotificationTypesPatch, ThresholdRange,
    Thresholds, ThresholdsPatch,
};
use aquasurveyor_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notification_preferences` table (flat columns).
#[derive(Debug, Clone, FromRow)]
pub struct NotificationPreferencesRow {
    pub id: DbId,
    pub user_id: DbId,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub notify_water_level: bool,
    pub notify_ph: bool,
    pub notify_dissolved_oxygen: bool,
    pub notify_temperature: bool,
    pub notify_pollution: bool,
    pub water_level_min: f64,
    pub water_level_max: f64,
    pub ph_min: f64,
    pub ph_max: f64,
    pub dissolved_oxygen_min: f64,
    pub dissolved_oxygen_max: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// API representation with nested toggles and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPreferences {
    pub id: DbId,
    pub user_id: DbId,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub notification_types: NotificationTypes,
    pub thresholds: Thresholds,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NotificationPreferences {
    pub fn alert_settings(&self) -> AlertSettings {
        AlertSettings {
            notification_types: self.notification_types,
            thresholds: self.thresholds,
        }
    }

    pub fn channel_settings(&self) -> ChannelSettings {
        ChannelSettings {
            email: self.email_notifications,
            sms: self.sms_notifications,
        }
    }
}

impl From<NotificationPreferencesRow> for NotificationPreferences {
    fn from(row: NotificationPreferencesRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            email_notifications: row.email_notifications,
            sms_notifications: row.sms_notifications,
            notification_types: NotificationTypes {
                water_level: row.notify_water_level,
                ph: row.notify_ph,
                dissolved_oxygen: row.notify_dissolved_oxygen,
                temperature: row.notify_temperature,
                pollution: row.notify_pollution,
            },
            thresholds: Thresholds {
                water_level: ThresholdRange::new(row.water_level_min, row.water_level_max),
                ph: ThresholdRange::new(row.ph_min, row.ph_max),
                dissolved_oxygen: ThresholdRange::new(
                    row.dissolved_oxygen_min,
                    row.dissolved_oxygen_max,
                ),
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for a partial preference update. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNotificationPreferences {
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub notification_types: Option<NotificationTypesPatch>,
    pub thresholds: Option<ThresholdsPatch>,
}

impl UpdateNotificationPreferences {
    /// Validate the supplied threshold values before they reach the database.
    pub fn validate(&self) -> Result<(), CoreError> {
        match &self.thresholds {
            Some(thresholds) => thresholds.validate(),
            None => Ok(()),
        }
    }
}
