//! # booking-mail
//!
//! SMTP transport for booking enquiry notifications.
//!
//! ```rust,ignore
//! use booking_core::env_lookup;
//! use booking_mail::{notifier_from_config, MailConfig};
//!
//! // Notifications are disabled unless every SMTP setting is present
//! let notifier = MailConfig::from_lookup(env_lookup)
//!     .map(|config| notifier_from_config(&config))
//!     .transpose()?;
//! ```

pub mod config;
pub mod smtp;

use booking_core::{MailError, Notifier};
use std::sync::Arc;

pub use config::MailConfig;
pub use smtp::SmtpMailer;

/// Build a `Notifier` that delivers through the configured SMTP relay
pub fn notifier_from_config(config: &MailConfig) -> Result<Notifier, MailError> {
    let mailer = SmtpMailer::new(config)?;
    Ok(Notifier::new(
        Arc::new(mailer),
        config.from.clone(),
        config.to.clone(),
    ))
}
