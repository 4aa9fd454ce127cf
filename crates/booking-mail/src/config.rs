//! # Mail Configuration
//!
//! SMTP relay settings. Notifications are only enabled when the relay
//! credentials and both addresses are present.

pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_SECURE: &str = "SMTP_SECURE";
pub const SMTP_USER: &str = "SMTP_USER";
pub const SMTP_PASS: &str = "SMTP_PASS";
pub const BOOKING_NOTIFY_TO: &str = "BOOKING_NOTIFY_TO";
pub const BOOKING_NOTIFY_FROM: &str = "BOOKING_NOTIFY_FROM";

/// Implicit TLS submission port
const SECURE_PORT: u16 = 465;
/// STARTTLS submission port
const STARTTLS_PORT: u16 = 587;

/// SMTP relay and addressing settings
#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS when true, STARTTLS otherwise
    pub secure: bool,
    pub username: String,
    pub password: String,
    /// Operator mailbox receiving enquiries
    pub to: String,
    /// Sender address on outgoing enquiries
    pub from: String,
}

impl MailConfig {
    /// Load from a key lookup; `None` means notifications are disabled
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get(SMTP_HOST)?;
        let username = get(SMTP_USER)?;
        let password = get(SMTP_PASS)?;
        let to = get(BOOKING_NOTIFY_TO)?;
        let from = get(BOOKING_NOTIFY_FROM)?;

        let secure = get(SMTP_SECURE).map(|v| is_truthy(&v)).unwrap_or(false);
        let port = get(SMTP_PORT)
            .and_then(|p| p.parse().ok())
            .unwrap_or(if secure { SECURE_PORT } else { STARTTLS_PORT });

        Some(Self {
            host,
            port,
            secure,
            username,
            password,
            to,
            from,
        })
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("to", &self.to)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
