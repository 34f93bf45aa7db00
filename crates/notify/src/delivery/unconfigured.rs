use async_trait::async_trait;

use crate::channel::{EmailSender, OutgoingEmail, OutgoingSms, SmsSender};
use crate::error::NotifyError;

/// Stand-in for a channel whose environment configuration is absent.
///
/// Every send fails, so the attempt still lands in history as `failed`.
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredChannel {
    label: &'static str,
}

impl UnconfiguredChannel {
    pub const fn new(label: &'static str) -> Self {
        Self { label }
    }
}

#[async_trait]
impl EmailSender for UnconfiguredChannel {
    async fn send_email(&self, _email: &OutgoingEmail) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured(self.label))
    }
}

#[async_trait]
impl SmsSender for UnconfiguredChannel {
    async fn send_sms(&self, _sms: &OutgoingSms) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured(self.label))
    }
}
