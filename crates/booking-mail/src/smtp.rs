//! SMTP mail transport
//!
//! Wraps lettre's `AsyncSmtpTransport` and sends each notification as a
//! multipart/alternative message (plain text + HTML).

use crate::config::MailConfig;
use async_trait::async_trait;
use booking_core::{MailError, MailTransport, NotificationEmail};
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use tracing::debug;

/// Authenticated SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport. No connection is made until the first send.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailError::Transport(format!("relay setup for {}: {}", config.host, e)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send_email(&self, email: &NotificationEmail) -> Result<(), MailError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!(to = %email.to, "SMTP relay accepted message");
        Ok(())
    }
}

fn mailbox(address: &str, role: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e| MailError::Address(format!("{} {:?}: {}", role, address, e)))
}

/// Assemble the MIME message for a notification
pub fn build_message(email: &NotificationEmail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox(&email.from, "sender")?)
        .to(mailbox(&email.to, "recipient")?)
        .subject(&email.subject);

    // A malformed guest address must not block the operator's copy
    if let Some(reply_to) = email.reply_to.as_deref() {
        if let Ok(reply_to) = reply_to.parse::<Mailbox>() {
            builder = builder.reply_to(reply_to);
        }
    }

    builder
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(email.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(email.html_body.clone()),
                ),
        )
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> NotificationEmail {
        NotificationEmail {
            from: "bookings@example.com".to_string(),
            to: "owner@example.com".to_string(),
            reply_to: Some("ada@example.com".to_string()),
            subject: "New booking enquiry (deposit received)".to_string(),
            text_body: "Name: Ada\nDeposit: $15.00\n".to_string(),
            html_body: "<p><strong>Name:</strong> Ada</p>".to_string(),
        }
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[test]
    fn test_mailer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailer>();
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(&email()).unwrap();
        let raw = formatted(&message);

        assert!(raw.contains("From: bookings@example.com"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Reply-To: ada@example.com"));
        assert!(raw.contains("Subject: New booking enquiry (deposit received)"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn test_invalid_sender_is_address_error() {
        let mut email = email();
        email.from = "not an address".to_string();
        assert!(matches!(build_message(&email), Err(MailError::Address(_))));
    }

    #[test]
    fn test_invalid_reply_to_is_dropped() {
        let mut email = email();
        email.reply_to = Some("nope".to_string());

        let raw = formatted(&build_message(&email).unwrap());
        assert!(!raw.contains("Reply-To"));
    }
}
