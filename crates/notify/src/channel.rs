//! Seams between the dispatcher and the outside world.
//!
//! Production wiring uses the adapters in [`crate::delivery`] and
//! [`crate::history::PgHistorySink`]; tests substitute in-memory fakes.

use aquasurveyor_db::models::notification_history::{
    CreateNotificationHistory, NotificationHistory,
};
use async_trait::async_trait;

use crate::error::NotifyError;

/// An email ready to hand to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    /// Optional HTML alternative sent alongside the plain-text body.
    pub html: Option<String>,
}

/// A text message ready to hand to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingSms {
    pub to: String,
    pub body: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), NotifyError>;
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, sms: &OutgoingSms) -> Result<(), NotifyError>;
}

/// Append-only store for delivery attempts.
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn record(
        &self,
        entry: CreateNotificationHistory,
    ) -> Result<NotificationHistory, NotifyError>;
}
