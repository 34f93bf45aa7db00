//! SMTP email delivery.
//!
//! The transport is built once from [`EmailConfig`] and shared by every send.
//! Without `SMTP_HOST` there is no config, and the caller should fall back to
//! an unconfigured channel.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::channel::{EmailSender, OutgoingEmail};
use crate::error::NotifyError;

const DEFAULT_PORT: u16 = 587;
const DEFAULT_FROM: &str = "AquaSurveyor <alerts@aquasurveyor.local>";

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// Connecting, authenticating, or the relay refusing the message.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    #[error("Could not assemble email: {0}")]
    Message(#[from] lettre::error::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpLogin {
    pub user: String,
    pub password: String,
}

/// SMTP relay settings.
///
/// | Variable        | Default                                     |
/// |-----------------|---------------------------------------------|
/// | `SMTP_HOST`     | required; unset disables email              |
/// | `SMTP_PORT`     | `587`                                       |
/// | `SMTP_FROM`     | `AquaSurveyor <alerts@aquasurveyor.local>`  |
/// | `SMTP_USER`     | none                                        |
/// | `SMTP_PASSWORD` | none; login is used only if both are set    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from: String,
    pub login: Option<SmtpLogin>,
}

impl EmailConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. An unparseable port falls back to
    /// the default.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let smtp_host = get("SMTP_HOST").filter(|h| !h.is_empty())?;
        let login = match (get("SMTP_USER"), get("SMTP_PASSWORD")) {
            (Some(user), Some(password)) => Some(SmtpLogin { user, password }),
            _ => None,
        };

        Some(Self {
            smtp_host,
            smtp_port: get("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            from: get("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM.to_string()),
            login,
        })
    }
}

/// Email over a STARTTLS relay.
#[derive(Debug)]
pub struct SmtpEmailSender {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from.parse()?;

        let mut transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let Some(SmtpLogin { user, password }) = config.login {
            transport = transport.credentials(Credentials::new(user, password));
        }

        Ok(Self {
            from,
            transport: transport.build(),
        })
    }
}

/// Plain text, or `multipart/alternative` when an HTML body is present.
fn compose(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, EmailError> {
    let headers = Message::builder()
        .from(from.clone())
        .to(email.to.parse()?)
        .subject(email.subject.as_str());

    let message = match email.html.as_deref() {
        None => headers
            .header(ContentType::TEXT_PLAIN)
            .body(email.text.clone())?,
        Some(html) => headers.multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            html.to_string(),
        ))?,
    };
    Ok(message)
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        let message = compose(&self.from, email)?;
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| EmailError::Smtp(e).into())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    fn sender_address() -> Mailbox {
        DEFAULT_FROM.parse().unwrap()
    }

    fn alert(to: &str, html: Option<&str>) -> OutgoingEmail {
        OutgoingEmail {
            to: to.to_string(),
            subject: "Water Quality Alert".to_string(),
            text: "Alerts for survey at location -2.5,54: Low pH alert".to_string(),
            html: html.map(str::to_string),
        }
    }

    #[test]
    fn no_host_means_no_config() {
        assert_eq!(EmailConfig::from_lookup(lookup(&[])), None);
        assert_eq!(EmailConfig::from_lookup(lookup(&[("SMTP_HOST", "")])), None);
    }

    #[test]
    fn defaults_apply_and_login_needs_both_parts() {
        let cfg = EmailConfig::from_lookup(lookup(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "not-a-port"),
            ("SMTP_USER", "mailer"),
        ]))
        .unwrap();
        assert_eq!(cfg.smtp_port, 587);
        assert_eq!(cfg.from, DEFAULT_FROM);
        assert_eq!(cfg.login, None);

        let cfg = EmailConfig::from_lookup(lookup(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        assert_eq!(cfg.smtp_port, 2525);
        assert_eq!(
            cfg.login,
            Some(SmtpLogin {
                user: "mailer".into(),
                password: "hunter2".into()
            })
        );
    }

    #[test]
    fn bad_sender_address_fails_construction() {
        let cfg = EmailConfig {
            smtp_host: "localhost".into(),
            smtp_port: DEFAULT_PORT,
            from: "alerts at example dot com".into(),
            login: None,
        };
        assert_matches!(SmtpEmailSender::new(cfg), Err(EmailError::InvalidAddress(_)));
    }

    #[test]
    fn text_only_alert_is_plain() {
        let message = compose(&sender_address(), &alert("owner@example.com", None)).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Water Quality Alert"));
        assert!(raw.contains("text/plain"));
        assert!(!raw.contains("multipart"));
    }

    #[test]
    fn html_body_becomes_an_alternative_part() {
        let message = compose(
            &sender_address(),
            &alert("owner@example.com", Some("<p>Low pH alert</p>")),
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn unparseable_recipient_is_rejected_before_sending() {
        assert_matches!(
            compose(&sender_address(), &alert("owner", None)),
            Err(EmailError::InvalidAddress(_))
        );
    }
}
