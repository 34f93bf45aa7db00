use crate::delivery::email::EmailError;
use crate::delivery::sms::SmsError;

/// Failure of a single delivery attempt or of recording it.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Sms(#[from] SmsError),

    /// The channel has no configuration in this deployment.
    #[error("{0} delivery is not configured")]
    NotConfigured(&'static str),

    /// Writing the history entry failed.
    #[error("Failed to record notification history: {0}")]
    History(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_display() {
        let err = NotifyError::NotConfigured("SMS");
        assert_eq!(err.to_string(), "SMS delivery is not configured");
    }

    #[test]
    fn sms_errors_display_transparently() {
        let err = NotifyError::from(SmsError::Rejected { status: 500 });
        assert_eq!(err.to_string(), "SMS provider returned HTTP 500");
    }
}
