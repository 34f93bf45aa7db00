//! Alert and ad-hoc notification delivery.
//!
//! - [`NotificationDispatcher`] turns threshold alerts into email and SMS
//!   sends and records every attempt in notification history.
//! - [`channel`] defines the sender and history-sink seams.
//! - [`delivery`] holds the concrete SMTP and Twilio adapters.

pub mod channel;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod history;

pub use channel::{EmailSender, HistorySink, OutgoingEmail, OutgoingSms, SmsSender};
pub use delivery::email::{EmailConfig, SmtpEmailSender};
pub use delivery::sms::{SmsConfig, TwilioSmsSender};
pub use delivery::unconfigured::UnconfiguredChannel;
pub use dispatcher::{AlertRecipient, NotificationDispatcher};
pub use error::NotifyError;
pub use history::PgHistorySink;
