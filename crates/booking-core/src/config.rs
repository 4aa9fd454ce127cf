//! # Payment Configuration
//!
//! Public payment settings resolved once at startup from string settings.
//! Resolution never fails: anything malformed degrades to "payment disabled".

use crate::money::Money;
use tracing::warn;

/// Default currency when none (or an unusable one) is configured
pub const DEFAULT_CURRENCY: &str = "usd";

pub const STRIPE_SECRET_KEY: &str = "STRIPE_SECRET_KEY";
pub const STRIPE_PUBLISHABLE_KEY: &str = "STRIPE_PUBLISHABLE_KEY";
pub const PAYMENT_CURRENCY: &str = "PAYMENT_CURRENCY";
pub const DEPOSIT_AMOUNT: &str = "DEPOSIT_AMOUNT";

/// Read a setting from the process environment, treating blank values as unset
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolved payment configuration.
///
/// Fields are private so `payment_required` always agrees with its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    publishable_key: Option<String>,
    secret_key_present: bool,
    currency: String,
    deposit_amount: u64,
    payment_required: bool,
}

impl Configuration {
    /// Build from parts. The currency code is normalized here, so `resolve`
    /// and direct callers end up with the same value.
    pub fn new(
        publishable_key: Option<String>,
        secret_key_present: bool,
        currency: &str,
        deposit_amount: u64,
    ) -> Self {
        let payment_required =
            secret_key_present && publishable_key.is_some() && deposit_amount > 0;

        Self {
            publishable_key,
            secret_key_present,
            currency: normalize_currency(Some(currency)),
            deposit_amount,
            payment_required,
        }
    }

    /// Resolve from a key lookup (environment, map, ...)
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let publishable_key = get(STRIPE_PUBLISHABLE_KEY).map(|v| v.trim().to_string());
        let secret_key_present = get(STRIPE_SECRET_KEY).is_some();
        let currency = normalize_currency(get(PAYMENT_CURRENCY).as_deref());
        let deposit_amount = parse_deposit_amount(get(DEPOSIT_AMOUNT).as_deref());

        Self::new(publishable_key, secret_key_present, &currency, deposit_amount)
    }

    /// Resolve from the process environment
    pub fn from_env() -> Self {
        Self::resolve(env_lookup)
    }

    pub fn publishable_key(&self) -> Option<&str> {
        self.publishable_key.as_deref()
    }

    pub fn secret_key_present(&self) -> bool {
        self.secret_key_present
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn deposit_amount(&self) -> u64 {
        self.deposit_amount
    }

    pub fn payment_required(&self) -> bool {
        self.payment_required
    }

    /// The configured deposit as a money value
    pub fn deposit(&self) -> Money {
        Money::new(self.deposit_amount, self.currency.clone())
    }
}

/// Parse a deposit amount in minor units.
///
/// Non-numeric, non-finite and non-positive values become 0; fractions
/// truncate toward zero.
pub fn parse_deposit_amount(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.trunc() as u64,
        Ok(_) => {
            warn!(value = raw, "Deposit amount is not positive, payment disabled");
            0
        }
        Err(_) => {
            warn!(value = raw, "Deposit amount is not a number, payment disabled");
            0
        }
    }
}

/// Normalize a currency code to three lowercase ASCII letters
pub fn normalize_currency(raw: Option<&str>) -> String {
    let Some(code) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return DEFAULT_CURRENCY.to_string();
    };

    let code = code.to_ascii_lowercase();
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_lowercase()) {
        code
    } else {
        warn!(value = %code, "Unsupported currency code, using {}", DEFAULT_CURRENCY);
        DEFAULT_CURRENCY.to_string()
    }
}
