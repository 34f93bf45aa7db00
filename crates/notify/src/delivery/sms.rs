//! Text messages through the Twilio REST API.
//!
//! One form-encoded POST per message with HTTP basic auth. Any non-2xx
//! answer counts as a failed delivery.

use std::time::Duration;

use async_trait::async_trait;

use crate::channel::{OutgoingSms, SmsSender};
use crate::error::NotifyError;

/// Upper bound on one provider round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("Could not reach SMS provider: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("SMS provider returned HTTP {status}")]
    Rejected { status: u16 },
}

/// Twilio account settings. All three credentials are required; any one
/// missing disables SMS.
///
/// | Variable              | Default                  |
/// |-----------------------|--------------------------|
/// | `TWILIO_ACCOUNT_SID`  | required                 |
/// | `TWILIO_AUTH_TOKEN`   | required                 |
/// | `TWILIO_PHONE_NUMBER` | required, E.164 sender   |
/// | `TWILIO_API_BASE`     | `https://api.twilio.com` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub api_base: String,
}

impl SmsConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let required = |key| get(key).filter(|v: &String| !v.is_empty());
        Some(Self {
            account_sid: required("TWILIO_ACCOUNT_SID")?,
            auth_token: required("TWILIO_AUTH_TOKEN")?,
            from_number: required("TWILIO_PHONE_NUMBER")?,
            api_base: get("TWILIO_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    fn messages_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{base}/2010-04-01/Accounts/{}/Messages.json", self.account_sid)
    }
}

pub struct TwilioSmsSender {
    http: reqwest::Client,
    config: SmsConfig,
}

impl TwilioSmsSender {
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    async fn post_message(&self, sms: &OutgoingSms) -> Result<(), SmsError> {
        let status = self
            .http
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", sms.to.as_str()),
                ("From", self.config.from_number.as_str()),
                ("Body", sms.body.as_str()),
            ])
            .send()
            .await?
            .status();

        if status.is_success() {
            Ok(())
        } else {
            Err(SmsError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send_sms(&self, sms: &OutgoingSms) -> Result<(), NotifyError> {
        self.post_message(sms).await.map_err(NotifyError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(api_base: &str) -> SmsConfig {
        SmsConfig {
            account_sid: "AC0001".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550000000".to_string(),
            api_base: api_base.to_string(),
        }
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        assert_eq!(
            account("https://sms.test/").messages_url(),
            "https://sms.test/2010-04-01/Accounts/AC0001/Messages.json"
        );
        assert_eq!(
            account("https://sms.test").messages_url(),
            account("https://sms.test/").messages_url()
        );
    }

    #[test]
    fn any_missing_credential_disables_sms() {
        let full = |key: &str| match key {
            "TWILIO_ACCOUNT_SID" => Some("AC0001".to_string()),
            "TWILIO_AUTH_TOKEN" => Some("token".to_string()),
            "TWILIO_PHONE_NUMBER" => Some("+15550000000".to_string()),
            _ => None,
        };
        let cfg = SmsConfig::from_lookup(full).unwrap();
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);

        for missing in ["TWILIO_ACCOUNT_SID", "TWILIO_AUTH_TOKEN", "TWILIO_PHONE_NUMBER"] {
            let partial = |key: &str| if key == missing { None } else { full(key) };
            assert_eq!(SmsConfig::from_lookup(partial), None, "{missing}");
        }
    }

    #[test]
    fn client_builds_with_timeout() {
        assert!(TwilioSmsSender::new(account(DEFAULT_API_BASE)).is_ok());
    }

    #[test]
    fn rejection_reports_status() {
        let err = SmsError::Rejected { status: 401 };
        assert_eq!(err.to_string(), "SMS provider returned HTTP 401");
    }
}
