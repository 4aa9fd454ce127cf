//! # Money
//!
//! Minor-unit amounts with en-US style display formatting.

use serde::{Deserialize, Serialize};

/// Currencies Stripe treats as having no minor unit
const ZERO_DECIMAL: &[&str] = &[
    "bif", "clp", "djf", "gnf", "jpy", "kmf", "krw", "mga", "pyg", "rwf", "ugx", "vnd", "vuv",
    "xaf", "xof", "xpf",
];

/// Currencies with three decimal places
const THREE_DECIMAL: &[&str] = &["bhd", "jod", "kwd", "omr", "tnd"];

/// Returns the number of decimal places for an ISO 4217 code
pub fn decimal_places(currency: &str) -> u32 {
    let code = currency.to_ascii_lowercase();
    if ZERO_DECIMAL.contains(&code.as_str()) {
        0
    } else if THREE_DECIMAL.contains(&code.as_str()) {
        3
    } else {
        2
    }
}

fn symbol(currency: &str) -> Option<&'static str> {
    let symbol = match currency {
        "usd" => "$",
        "eur" => "€",
        "gbp" => "£",
        "jpy" => "¥",
        "cad" => "CA$",
        "aud" => "A$",
        "nzd" => "NZ$",
        "mxn" => "MX$",
        "hkd" => "HK$",
        "cny" => "CN¥",
        "inr" => "₹",
        "krw" => "₩",
        "brl" => "R$",
        "ils" => "₪",
        "twd" => "NT$",
        "php" => "₱",
        "vnd" => "₫",
        _ => return None,
    };
    Some(symbol)
}

/// Amount in the smallest currency unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: u64,
    pub currency: String,
}

impl Money {
    pub fn new(amount: u64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into().to_ascii_lowercase(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Format for display (e.g., "$1,500.00", "CHF 12.50")
    pub fn display(&self) -> String {
        let places = decimal_places(&self.currency);
        let divisor = 10_u64.pow(places);
        let whole = group_thousands(self.amount / divisor);
        let number = if places == 0 {
            whole
        } else {
            format!(
                "{}.{:0width$}",
                whole,
                self.amount % divisor,
                width = places as usize
            )
        };

        match symbol(&self.currency) {
            Some(symbol) => format!("{}{}", symbol, number),
            None => format!("{}\u{a0}{}", self.currency.to_ascii_uppercase(), number),
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
