//! Fan-out of threshold alerts and ad-hoc messages to delivery channels.
//!
//! Every attempt, successful or not, produces exactly one history entry.
//! Channel sends are sequential and independent: a failed email never
//! prevents the SMS attempt that follows it.

use std::sync::Arc;

use aquasurveyor_core::channels::{
    ALERT_SUBJECT, CHANNEL_EMAIL, CHANNEL_SMS, SMS_SUBJECT, STATUS_FAILED, STATUS_SENT,
};
use aquasurveyor_core::preferences::ChannelSettings;
use aquasurveyor_core::thresholds::{join_messages, ThresholdAlert};
use aquasurveyor_core::types::DbId;
use aquasurveyor_db::models::notification_history::{
    AlertMetadata, CreateNotificationHistory, NotificationHistory,
};
use aquasurveyor_db::models::survey::Survey;

use crate::channel::{EmailSender, HistorySink, OutgoingEmail, OutgoingSms, SmsSender};
use crate::error::NotifyError;

/// Contact details of the user an alert is addressed to.
#[derive(Debug, Clone)]
pub struct AlertRecipient {
    pub user_id: DbId,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Sends notifications and records each attempt.
#[derive(Clone)]
pub struct NotificationDispatcher {
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
    history: Arc<dyn HistorySink>,
}

impl NotificationDispatcher {
    pub fn new(
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
        history: Arc<dyn HistorySink>,
    ) -> Self {
        Self {
            email,
            sms,
            history,
        }
    }

    /// Deliver `alerts` for `survey` on the recipient's enabled channels.
    ///
    /// Returns the history entries written, in send order. With no alerts
    /// nothing is sent or recorded. SMS additionally requires a phone
    /// number; without one the SMS attempt is skipped entirely. Both
    /// entries carry the first alert's type and bound as metadata. A failed
    /// history write is returned only after both attempts have run.
    pub async fn dispatch_alerts(
        &self,
        recipient: &AlertRecipient,
        survey: &Survey,
        channels: ChannelSettings,
        alerts: &[ThresholdAlert],
    ) -> Result<Vec<NotificationHistory>, NotifyError> {
        let Some(first) = alerts.first() else {
            return Ok(Vec::new());
        };

        let joined = join_messages(alerts);
        let metadata = AlertMetadata {
            survey_id: survey.id,
            alert_type: first.parameter,
            threshold: first.bound,
        };
        let mut records = Vec::with_capacity(2);
        // The SMS attempt still runs when the email entry could not be stored.
        let mut history_error = None;

        if channels.email {
            let email = OutgoingEmail {
                to: recipient.email.clone(),
                subject: ALERT_SUBJECT.to_string(),
                text: format!("Alerts for survey at location {}: {joined}", survey.location),
                html: None,
            };
            let result = self.email.send_email(&email).await;
            log_attempt(CHANNEL_EMAIL, recipient.user_id, &result);
            let recorded = self
                .record(
                    recipient.user_id,
                    CHANNEL_EMAIL,
                    ALERT_SUBJECT,
                    &joined,
                    result.err().map(|e| e.to_string()),
                    Some(metadata),
                )
                .await;
            match recorded {
                Ok(record) => records.push(record),
                Err(e) => history_error = Some(e),
            }
        }

        if channels.sms {
            match recipient.phone_number.as_deref() {
                Some(phone) => {
                    let sms = OutgoingSms {
                        to: phone.to_string(),
                        body: format!("{ALERT_SUBJECT}: {joined}"),
                    };
                    let result = self.sms.send_sms(&sms).await;
                    log_attempt(CHANNEL_SMS, recipient.user_id, &result);
                    let recorded = self
                        .record(
                            recipient.user_id,
                            CHANNEL_SMS,
                            ALERT_SUBJECT,
                            &joined,
                            result.err().map(|e| e.to_string()),
                            Some(metadata),
                        )
                        .await;
                    match recorded {
                        Ok(record) => records.push(record),
                        Err(e) => {
                            history_error.get_or_insert(e);
                        }
                    }
                }
                None => {
                    tracing::debug!(
                        user_id = recipient.user_id,
                        survey_id = survey.id,
                        "SMS enabled but no phone number, skipping"
                    );
                }
            }
        }

        match history_error {
            Some(e) => Err(e),
            None => Ok(records),
        }
    }

    /// Send one ad-hoc email on behalf of `user_id`.
    ///
    /// The attempt is recorded either way; a delivery failure is returned
    /// after the failed entry has been written.
    pub async fn send_email(
        &self,
        user_id: DbId,
        email: &OutgoingEmail,
    ) -> Result<NotificationHistory, NotifyError> {
        let result = self.email.send_email(email).await;
        log_attempt(CHANNEL_EMAIL, user_id, &result);
        self.record_and_forward(user_id, CHANNEL_EMAIL, &email.subject, &email.text, result)
            .await
    }

    /// Send one ad-hoc SMS on behalf of `user_id`.
    pub async fn send_sms(
        &self,
        user_id: DbId,
        sms: &OutgoingSms,
    ) -> Result<NotificationHistory, NotifyError> {
        let result = self.sms.send_sms(sms).await;
        log_attempt(CHANNEL_SMS, user_id, &result);
        self.record_and_forward(user_id, CHANNEL_SMS, SMS_SUBJECT, &sms.body, result)
            .await
    }

    async fn record_and_forward(
        &self,
        user_id: DbId,
        channel: &'static str,
        subject: &str,
        message: &str,
        result: Result<(), NotifyError>,
    ) -> Result<NotificationHistory, NotifyError> {
        match result {
            Ok(()) => {
                self.record(user_id, channel, subject, message, None, None)
                    .await
            }
            Err(e) => {
                self.record(user_id, channel, subject, message, Some(e.to_string()), None)
                    .await?;
                Err(e)
            }
        }
    }

    async fn record(
        &self,
        user_id: DbId,
        channel: &'static str,
        subject: &str,
        message: &str,
        error: Option<String>,
        metadata: Option<AlertMetadata>,
    ) -> Result<NotificationHistory, NotifyError> {
        let entry = CreateNotificationHistory {
            user_id,
            channel,
            subject: subject.to_string(),
            message: message.to_string(),
            status: if error.is_some() {
                STATUS_FAILED
            } else {
                STATUS_SENT
            },
            error,
            metadata,
        };
        self.history.record(entry).await
    }
}

fn log_attempt(channel: &str, user_id: DbId, result: &Result<(), NotifyError>) {
    match result {
        Ok(()) => tracing::info!(channel, user_id, "Notification sent"),
        Err(e) => tracing::warn!(channel, user_id, error = %e, "Notification delivery failed"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
