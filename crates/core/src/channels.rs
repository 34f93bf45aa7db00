//! Well-known channel and delivery-status constants.
//!
//! These must match the values allowed by the `ck_notification_history_*`
//! check constraints.

/// Notification delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";

/// Notification delivered as a text message.
pub const CHANNEL_SMS: &str = "sms";

pub const STATUS_SENT: &str = "sent";
pub const STATUS_FAILED: &str = "failed";

/// Subject line for threshold alert notifications on every channel.
pub const ALERT_SUBJECT: &str = "Water Quality Alert";

/// Subject recorded for ad-hoc SMS sends, which have no subject of their own.
pub const SMS_SUBJECT: &str = "SMS Notification";
