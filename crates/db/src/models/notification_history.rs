//! Notification history model and DTOs.
//!
//! History rows are append-only: there is a create DTO but no update DTO.

use aquasurveyor_core::parameters::{Bound, ParameterKind};
use aquasurveyor_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notification_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationHistory {
    pub id: DbId,
    pub user_id: DbId,
    pub channel: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub error: Option<String>,
    pub survey_id: Option<DbId>,
    pub alert_type: Option<String>,
    pub threshold: Option<String>,
    pub created_at: Timestamp,
}

impl NotificationHistory {
    /// The alert link stored on this row, if it came from a threshold alert.
    ///
    /// `None` when any of the three columns is empty or holds an unknown value.
    pub fn metadata(&self) -> Option<AlertMetadata> {
        Some(AlertMetadata {
            survey_id: self.survey_id?,
            alert_type: self.alert_type.as_deref()?.parse().ok()?,
            threshold: self.threshold.as_deref()?.parse().ok()?,
        })
    }
}

/// Links an alert-triggered delivery back to its survey and first alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertMetadata {
    pub survey_id: DbId,
    pub alert_type: ParameterKind,
    pub threshold: Bound,
}

/// DTO for recording one delivery attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNotificationHistory {
    pub user_id: DbId,
    pub channel: &'static str,
    pub subject: String,
    pub message: String,
    pub status: &'static str,
    pub error: Option<String>,
    pub metadata: Option<AlertMetadata>,
}
