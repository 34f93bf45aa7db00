//! External delivery channels.
//!
//! SMTP email and Twilio SMS, plus a placeholder for channels with no
//! configuration.

pub mod email;
pub mod sms;
pub mod unconfigured;
