//! # Payment Gateway Trait
//!
//! Seam between the booking flow and the payment processor.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │         PaymentGateway (trait)           │
//! │  ├── create_intent()                     │
//! │  ├── retrieve_intent()                   │
//! │  └── provider_name()                     │
//! └──────────────────────────────────────────┘
//!                     ▲
//!          ┌──────────┴──────────┐
//!  ┌───────┴───────┐     ┌───────┴───────┐
//!  │ StripePayment │     │  test doubles │
//!  │    Gateway    │     │               │
//!  └───────────────┘     └───────────────┘
//! ```

use crate::booking::BookingPayload;
use crate::config::Configuration;
use crate::error::GatewayResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A processor-side payment intent (owned by the processor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Only returned on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub amount: u64,
    pub currency: String,
    pub status: String,
}

/// Parameters for creating a payment intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    /// Amount in minor units
    pub amount: u64,
    pub currency: String,
    pub metadata: BTreeMap<String, String>,
}

impl IntentRequest {
    /// Deposit hold for a booking, at the configured amount and currency
    pub fn for_booking(payload: &BookingPayload, config: &Configuration) -> Self {
        Self {
            amount: config.deposit_amount(),
            currency: config.currency().to_string(),
            metadata: payload.intent_metadata(),
        }
    }
}

/// Payment processor operations used by the booking flow.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the requested amount.
    async fn create_intent(&self, request: &IntentRequest) -> GatewayResult<PaymentIntent>;

    /// Fetch the current state of an existing intent.
    async fn retrieve_intent(&self, id: &str) -> GatewayResult<PaymentIntent>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Shared, read-only gateway handle
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intent_request_for_booking() {
        let config = Configuration::new(Some("pk_test".into()), true, "eur", 2500);
        let payload = BookingPayload::from_value(json!({
            "name": "Ada",
            "guests": "3",
            "message": "Late arrival"
        }))
        .unwrap();

        let request = IntentRequest::for_booking(&payload, &config);
        assert_eq!(request.amount, 2500);
        assert_eq!(request.currency, "eur");
        assert_eq!(request.metadata.get("name").map(String::as_str), Some("Ada"));
        assert_eq!(
            request.metadata.get("message").map(String::as_str),
            Some("Late arrival")
        );
    }

    #[test]
    fn test_client_secret_omitted_when_absent() {
        let intent = PaymentIntent {
            id: "pi_123".into(),
            client_secret: None,
            amount: 1500,
            currency: "usd".into(),
            status: "succeeded".into(),
        };
        let value = serde_json::to_value(&intent).unwrap();
        assert!(value.get("client_secret").is_none());
    }
}
