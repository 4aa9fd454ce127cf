//! # Booking Enquiry
//!
//! The payload a guest submits, its presence-only validation, and the
//! metadata attached to a payment intent.

use crate::error::BookingError;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Required fields, in the order they are reported
pub const REQUIRED_FIELDS: [&str; 6] = ["name", "email", "phone", "checkIn", "checkOut", "guests"];

/// Status recorded when payment is required but was never confirmed
pub const STATUS_PAYMENT_PENDING: &str = "payment-pending";

/// Status recorded when no payment is taken
pub const STATUS_NOT_CHARGED: &str = "not-charged";

/// Which phase of the booking flow a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingAction {
    /// Validate and (optionally) create a payment intent
    #[default]
    Submit,
    /// Re-check a payment intent and notify the operator
    Confirm,
}

/// A guest's booking enquiry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub check_in: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub check_out: Option<String>,
    /// Accepts `2` as well as `"2"`
    #[serde(default, deserialize_with = "lenient_string")]
    pub guests: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_intent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_status: Option<String>,
}

impl BookingPayload {
    /// Decode from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, BookingError> {
        serde_json::from_value(value).map_err(|e| BookingError::InvalidBody {
            detail: e.to_string(),
        })
    }

    /// `confirm` selects the confirm flow; anything else is a submission
    pub fn action(&self) -> BookingAction {
        match self.action.as_deref().map(str::trim) {
            Some(a) if a.eq_ignore_ascii_case("confirm") => BookingAction::Confirm,
            _ => BookingAction::Submit,
        }
    }

    /// Look up a field by its wire name
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "checkIn" => &self.check_in,
            "checkOut" => &self.check_out,
            "guests" => &self.guests,
            "message" => &self.message,
            "paymentStatus" => &self.payment_status,
            "paymentIntentId" => &self.payment_intent_id,
            _ => return None,
        };
        present(value)
    }

    /// Check that every required field is present and non-blank.
    ///
    /// Reports all missing fields at once. No format checks.
    pub fn validate(&self) -> Result<(), BookingError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|name| self.field(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BookingError::MissingFields(missing))
        }
    }

    /// Whether the recorded payment status means the deposit went through
    pub fn deposit_received(&self) -> bool {
        self.payment_status
            .as_deref()
            .map(|s| s.trim().eq_ignore_ascii_case("succeeded"))
            .unwrap_or(false)
    }

    /// Opaque metadata attached to a payment intent
    pub fn intent_metadata(&self) -> BTreeMap<String, String> {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();

        BTreeMap::from([
            ("name".to_string(), value(&self.name)),
            ("email".to_string(), value(&self.email)),
            ("phone".to_string(), value(&self.phone)),
            ("checkIn".to_string(), value(&self.check_in)),
            ("checkOut".to_string(), value(&self.check_out)),
            ("guests".to_string(), value(&self.guests)),
            ("message".to_string(), value(&self.message)),
        ])
    }

    /// Labelled lines for the operator notification, in display order
    pub fn summary_lines(&self) -> Vec<(&'static str, &str)> {
        const LABELS: [(&str, &str); 9] = [
            ("Name", "name"),
            ("Email", "email"),
            ("Phone", "phone"),
            ("Check-in", "checkIn"),
            ("Check-out", "checkOut"),
            ("Guests", "guests"),
            ("Message", "message"),
            ("Payment status", "paymentStatus"),
            ("Payment intent", "paymentIntentId"),
        ];

        LABELS
            .iter()
            .filter_map(|(label, field)| self.field(field).map(|v| (*label, v)))
            .collect()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Accept strings, numbers and booleans as text; null as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}
