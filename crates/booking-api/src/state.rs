//! # Application State
//!
//! Shared state for the Axum application.
//! Everything here is built once at startup and only read by handlers.

use booking_core::{env_lookup, BoxedPaymentGateway, Configuration, Notifier};
use booking_mail::{notifier_from_config, MailConfig};
use booking_stripe::{StripeConfig, StripePaymentGateway};
use std::sync::Arc;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Value for `Access-Control-Allow-Origin` on the booking endpoint
    pub allowed_origin: String,
}

impl AppConfig {
    /// Load from a key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(8080),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            allowed_origin: lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "*".to_string()),
        }
    }

    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server config
    pub config: AppConfig,
    /// Resolved payment configuration
    pub settings: Arc<Configuration>,
    /// Payment processor, absent without a secret key
    pub gateway: Option<BoxedPaymentGateway>,
    /// Operator notifications, absent unless mail is fully configured
    pub notifier: Option<Arc<Notifier>>,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(
        config: AppConfig,
        settings: Configuration,
        gateway: Option<BoxedPaymentGateway>,
        notifier: Option<Notifier>,
    ) -> Self {
        Self {
            config,
            settings: Arc::new(settings),
            gateway,
            notifier: notifier.map(Arc::new),
        }
    }

    /// Build everything from the environment (and `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig::from_env();
        let settings = Configuration::from_env();

        let gateway = match StripeConfig::from_lookup(env_lookup) {
            Some(stripe) => {
                let gateway = StripePaymentGateway::new(stripe)
                    .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
                Some(Arc::new(gateway) as BoxedPaymentGateway)
            }
            None => None,
        };

        let notifier = match MailConfig::from_lookup(env_lookup) {
            Some(mail) => {
                info!("Mail relay: {}:{}", mail.host, mail.port);
                Some(
                    notifier_from_config(&mail)
                        .map_err(|e| anyhow::anyhow!("Failed to initialize mail: {}", e))?,
                )
            }
            None => None,
        };

        Ok(Self::new(config, settings, gateway, notifier))
    }

    /// Whether booking emails will be sent
    pub fn notifications_enabled(&self) -> bool {
        self.notifier.is_some()
    }
}
