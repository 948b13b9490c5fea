use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::model::order::{OrderRecord, StatusChange};
use crate::time::clock_time;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub channel: String,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
}

pub trait NotificationChannel {
    fn name(&self) -> &str;
    /// Builds the channel-specific message for a completed order.
    fn compose(&self, order: &OrderRecord, at: DateTime<Utc>) -> Result<Message, NotifyError>;
    fn send(&self, message: &Message) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Primary(Message),
    Fallback(Message),
    /// Both channels failed; carries the last error text.
    Failed(String),
    /// The change was not a transition into "Completed".
    Skipped,
}

impl DeliveryOutcome {
    /// Whether the order should be flagged as notified. Any attempt counts,
    /// including one where every channel failed.
    pub fn attempted(&self) -> bool {
        !matches!(self, DeliveryOutcome::Skipped)
    }
}

/// Sends the job-completed notice on the primary channel, falling back to
/// the secondary one when the first fails.
pub struct CompletionNotifier<P, F> {
    primary: P,
    fallback: F,
}

impl<P: NotificationChannel, F: NotificationChannel> CompletionNotifier<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn on_status_change(&self, change: &StatusChange, at: DateTime<Utc>) -> DeliveryOutcome {
        if !change.became_completed() {
            return DeliveryOutcome::Skipped;
        }
        let order = &change.after;

        match deliver(&self.primary, order, at) {
            Ok(message) => {
                log::info!("{} notification sent for {}", self.primary.name(), order.order_id);
                return DeliveryOutcome::Primary(message);
            }
            Err(e) => {
                log::error!(
                    "{} failed, falling back to {}: {}",
                    self.primary.name(),
                    self.fallback.name(),
                    e
                );
            }
        }

        match deliver(&self.fallback, order, at) {
            Ok(message) => {
                log::info!("{} notification sent for {}", self.fallback.name(), order.order_id);
                DeliveryOutcome::Fallback(message)
            }
            Err(e) => {
                log::error!("All notifications failed for {}: {}", order.order_id, e);
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }
}

fn deliver<C: NotificationChannel>(
    channel: &C,
    order: &OrderRecord,
    at: DateTime<Utc>,
) -> Result<Message, NotifyError> {
    let message = channel.compose(order, at)?;
    channel.send(&message)?;
    Ok(message)
}

pub fn chat_text(order: &OrderRecord, at: DateTime<Utc>) -> String {
    format!(
        "Hi {}, job {} is completed by Technician {} at {}. Thank you!",
        order.customer_name,
        order.order_id,
        order.assigned_technician,
        clock_time(at)
    )
}

pub fn email_subject(order: &OrderRecord) -> String {
    format!("Job {} Completed", order.order_id)
}

pub fn email_body(order: &OrderRecord) -> String {
    format!(
        "<h2>Job Completed</h2>\n<p>Dear {},</p>\n<p>Your service job {} has been completed.</p>",
        order.customer_name, order.order_id
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Chat,
    Email,
}

/// Channel that appends composed messages to a JSON-lines outbox file for
/// an external sender to pick up.
pub struct OutboxChannel {
    name: String,
    kind: MessageKind,
    path: PathBuf,
    /// Fixed recipient for email, since orders carry no address.
    email_recipient: String,
}

impl OutboxChannel {
    pub fn chat(path: PathBuf) -> Self {
        Self {
            name: "chat".to_string(),
            kind: MessageKind::Chat,
            path,
            email_recipient: String::new(),
        }
    }

    pub fn email(path: PathBuf, recipient: impl Into<String>) -> Self {
        Self {
            name: "email".to_string(),
            kind: MessageKind::Email,
            path,
            email_recipient: recipient.into(),
        }
    }
}

impl NotificationChannel for OutboxChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn compose(&self, order: &OrderRecord, at: DateTime<Utc>) -> Result<Message, NotifyError> {
        match self.kind {
            MessageKind::Chat => {
                if order.phone.trim().is_empty() {
                    return Err(NotifyError::NoRecipient {
                        channel: self.name.clone(),
                        order_id: order.order_id.clone(),
                    });
                }
                Ok(Message {
                    channel: self.name.clone(),
                    recipient: order.phone.clone(),
                    subject: None,
                    body: chat_text(order, at),
                })
            }
            MessageKind::Email => Ok(Message {
                channel: self.name.clone(),
                recipient: self.email_recipient.clone(),
                subject: Some(email_subject(order)),
                body: email_body(order),
            }),
        }
    }

    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(message)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::order::STATUS_COMPLETED;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct MockChannel {
        name: &'static str,
        fail: bool,
        sent: RefCell<Vec<Message>>,
    }

    impl MockChannel {
        fn new(name: &'static str, fail: bool) -> Self {
            Self { name, fail, sent: RefCell::new(Vec::new()) }
        }
    }

    impl NotificationChannel for MockChannel {
        fn name(&self) -> &str { self.name }
        fn compose(&self, order: &OrderRecord, at: DateTime<Utc>) -> Result<Message, NotifyError> {
            Ok(Message {
                channel: self.name.to_string(),
                recipient: order.phone.clone(),
                subject: None,
                body: chat_text(order, at),
            })
        }
        fn send(&self, message: &Message) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Delivery {
                    channel: self.name.to_string(),
                    reason: "unreachable".to_string(),
                });
            }
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 14, 5, 0).unwrap()
    }

    fn completion_change() -> StatusChange {
        let mut before = OrderRecord::new("ORDER4821".into(), "Ali".into());
        before.customer_name = "Siti".into();
        before.phone = "+60123456789".into();
        let mut after = before.clone();
        after.status = STATUS_COMPLETED.to_string();
        StatusChange { before, after }
    }

    #[test]
    fn test_chat_text() {
        let change = completion_change();
        assert_eq!(
            chat_text(&change.after, at()),
            "Hi Siti, job ORDER4821 is completed by Technician Ali at 14:05. Thank you!"
        );
        assert_eq!(email_subject(&change.after), "Job ORDER4821 Completed");
    }

    #[test]
    fn test_primary_success_skips_fallback() {
        let notifier = CompletionNotifier::new(MockChannel::new("chat", false), MockChannel::new("email", false));
        let outcome = notifier.on_status_change(&completion_change(), at());

        assert!(matches!(outcome, DeliveryOutcome::Primary(_)));
        assert_eq!(notifier.primary.sent.borrow().len(), 1);
        assert!(notifier.fallback.sent.borrow().is_empty());
    }

    #[test]
    fn test_falls_back_when_primary_fails() {
        let notifier = CompletionNotifier::new(MockChannel::new("chat", true), MockChannel::new("email", false));
        let outcome = notifier.on_status_change(&completion_change(), at());

        assert!(matches!(outcome, DeliveryOutcome::Fallback(ref m) if m.channel == "email"));
        assert_eq!(notifier.fallback.sent.borrow().len(), 1);
    }

    #[test]
    fn test_both_fail_still_counts_as_attempt() {
        let notifier = CompletionNotifier::new(MockChannel::new("chat", true), MockChannel::new("email", true));
        let outcome = notifier.on_status_change(&completion_change(), at());

        assert!(matches!(outcome, DeliveryOutcome::Failed(_)));
        assert!(outcome.attempted());
    }

    #[test]
    fn test_non_transition_is_skipped() {
        let notifier = CompletionNotifier::new(MockChannel::new("chat", false), MockChannel::new("email", false));
        let mut change = completion_change();
        change.before.status = STATUS_COMPLETED.to_string();

        let outcome = notifier.on_status_change(&change, at());
        assert_eq!(outcome, DeliveryOutcome::Skipped);
        assert!(!outcome.attempted());
        assert!(notifier.primary.sent.borrow().is_empty());
    }

    #[test]
    fn test_outbox_chat_without_phone_falls_back_to_email() {
        let dir = tempdir().unwrap();
        let outbox = dir.path().join("outbox.jsonl");
        let notifier = CompletionNotifier::new(
            OutboxChannel::chat(outbox.clone()),
            OutboxChannel::email(outbox.clone(), "customer@example.com"),
        );

        let mut change = completion_change();
        change.after.phone.clear();
        let outcome = notifier.on_status_change(&change, at());
        assert!(matches!(outcome, DeliveryOutcome::Fallback(_)));

        let content = std::fs::read_to_string(&outbox).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let message: Message = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(message.recipient, "customer@example.com");
        assert_eq!(message.subject.as_deref(), Some("Job ORDER4821 Completed"));
    }
}
