//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! Secrets come from the same key lookup used for the rest of the service.

use tracing::warn;

pub const STRIPE_SECRET_KEY: &str = "STRIPE_SECRET_KEY";
pub const STRIPE_API_BASE: &str = "STRIPE_API_BASE";

const DEFAULT_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_..., sk_live_... or a restricted rk_ key)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Create config with an explicit secret key
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Load from a key lookup.
    ///
    /// Returns `None` when no secret key is set: payments are then disabled
    /// rather than misconfigured.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup(STRIPE_SECRET_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())?;

        if !has_known_prefix(&secret_key) {
            warn!("STRIPE_SECRET_KEY does not look like a Stripe secret key");
        }

        let mut config = Self::new(secret_key);
        if let Some(base) = lookup(STRIPE_API_BASE).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_base_url(base.trim().trim_end_matches('/'));
        }
        Some(config)
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

// Keeps the secret key out of logs
impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("test_mode", &self.is_test_mode())
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

fn has_known_prefix(key: &str) -> bool {
    ["sk_test_", "sk_live_", "rk_test_", "rk_live_"]
        .iter()
        .any(|prefix| key.starts_with(prefix))
}
