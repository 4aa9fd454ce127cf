//! # Operator Notification
//!
//! Composes the booking enquiry email and hands it to a `MailTransport`.
//! Delivery is fire-and-forget from the booking flow's point of view: a
//! failure is reported to the caller but never retried.

use crate::booking::BookingPayload;
use crate::error::MailError;
use crate::money::Money;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

const SUBJECT: &str = "New booking enquiry";
const DEPOSIT_RECEIVED_SUFFIX: &str = " (deposit received)";
const NO_DEPOSIT: &str = "No deposit charged";

/// A fully rendered email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEmail {
    pub from: String,
    pub to: String,
    /// Guest address, so the operator can answer directly
    pub reply_to: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Outbound mail delivery
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_email(&self, email: &NotificationEmail) -> Result<(), MailError>;
}

/// Sends booking enquiries to the property operator
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    from: String,
    to: String,
}

impl Notifier {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Compose and send one enquiry email
    #[instrument(skip_all, fields(to = %self.to))]
    pub async fn send(&self, payload: &BookingPayload, deposit: &Money) -> Result<(), MailError> {
        let email = compose(payload, deposit, &self.from, &self.to);
        self.transport.send_email(&email).await?;
        info!(subject = %email.subject, "Booking notification sent");
        Ok(())
    }
}

/// Render the enquiry email for a payload
pub fn compose(payload: &BookingPayload, deposit: &Money, from: &str, to: &str) -> NotificationEmail {
    let subject = if payload.deposit_received() {
        format!("{}{}", SUBJECT, DEPOSIT_RECEIVED_SUFFIX)
    } else {
        SUBJECT.to_string()
    };

    let deposit_line = if deposit.is_zero() {
        NO_DEPOSIT.to_string()
    } else {
        format!("Deposit: {}", deposit.display())
    };

    let lines = payload.summary_lines();

    let mut text_body = String::new();
    for (label, value) in &lines {
        text_body.push_str(&format!("{}: {}\n", label, value));
    }
    text_body.push_str(&deposit_line);
    text_body.push('\n');

    let mut html_body = String::from("<h2>New booking enquiry</h2>\n");
    for (label, value) in &lines {
        html_body.push_str(&format!(
            "<p><strong>{}:</strong> {}</p>\n",
            label,
            escape_html(value)
        ));
    }
    html_body.push_str(&format!("<p>{}</p>\n", escape_html(&deposit_line)));

    let reply_to = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(String::from);

    NotificationEmail {
        from: from.to_string(),
        to: to.to_string(),
        reply_to,
        subject,
        text_body,
        html_body,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn payload(extra: serde_json::Value) -> BookingPayload {
        let mut base = json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "checkIn": "2026-07-01",
            "checkOut": "2026-07-05",
            "guests": 2
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        BookingPayload::from_value(base).unwrap()
    }

    #[test]
    fn test_subject_without_deposit() {
        let email = compose(&payload(json!({})), &Money::new(0, "usd"), "a@x", "b@x");
        assert_eq!(email.subject, "New booking enquiry");
    }

    #[test]
    fn test_subject_with_deposit_received() {
        let p = payload(json!({ "paymentStatus": "SUCCEEDED" }));
        let email = compose(&p, &Money::new(1500, "usd"), "a@x", "b@x");
        assert_eq!(email.subject, "New booking enquiry (deposit received)");
    }

    #[test]
    fn test_text_body_lines_in_order() {
        let p = payload(json!({
            "message": "Cot please",
            "paymentStatus": "succeeded",
            "paymentIntentId": "pi_123"
        }));
        let email = compose(&p, &Money::new(1500, "usd"), "a@x", "b@x");

        assert_eq!(
            email.text_body,
            "Name: Ada Lovelace\n\
             Email: ada@example.com\n\
             Phone: 555-0100\n\
             Check-in: 2026-07-01\n\
             Check-out: 2026-07-05\n\
             Guests: 2\n\
             Message: Cot please\n\
             Payment status: succeeded\n\
             Payment intent: pi_123\n\
             Deposit: $15.00\n"
        );
    }

    #[test]
    fn test_zero_deposit_line() {
        let email = compose(&payload(json!({})), &Money::new(0, "eur"), "a@x", "b@x");
        assert!(email.text_body.ends_with("No deposit charged\n"));
        assert!(email.html_body.contains("<p>No deposit charged</p>"));
    }

    #[test]
    fn test_html_escapes_input() {
        let p = payload(json!({ "message": "<script>alert('x')</script> & more" }));
        let email = compose(&p, &Money::new(0, "usd"), "a@x", "b@x");

        assert!(!email.html_body.contains("<script>"));
        assert!(email
            .html_body
            .contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
    }

    #[test]
    fn test_reply_to_is_guest_email() {
        let email = compose(&payload(json!({})), &Money::new(0, "usd"), "a@x", "b@x");
        assert_eq!(email.reply_to.as_deref(), Some("ada@example.com"));
        assert_eq!(email.from, "a@x");
        assert_eq!(email.to, "b@x");
    }

    struct RecordingTransport {
        sent: Mutex<Vec<NotificationEmail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send_email(&self, email: &NotificationEmail) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl MailTransport for FailingTransport {
        async fn send_email(&self, _email: &NotificationEmail) -> Result<(), MailError> {
            Err(MailError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_notifier_sends_through_transport() {
        let transport = Arc::new(RecordingTransport {
            sent: Mutex::new(Vec::new()),
        });
        let notifier = Notifier::new(transport.clone(), "desk@example.com", "owner@example.com");

        notifier
            .send(&payload(json!({})), &Money::new(1500, "usd"))
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].from, "desk@example.com");
    }

    #[tokio::test]
    async fn test_notifier_surfaces_transport_error() {
        let notifier = Notifier::new(Arc::new(FailingTransport), "a@x", "b@x");
        let result = notifier.send(&payload(json!({})), &Money::new(0, "usd")).await;
        assert!(matches!(result, Err(MailError::Transport(_))));
    }
}
