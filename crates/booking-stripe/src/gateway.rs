//! # Stripe Payment Intents
//!
//! `PaymentGateway` implementation over the Stripe PaymentIntents API.

use crate::config::StripeConfig;
use async_trait::async_trait;
use booking_core::{GatewayError, GatewayResult, IntentRequest, PaymentGateway, PaymentIntent};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Stripe PaymentIntents gateway
pub struct StripePaymentGateway {
    config: StripeConfig,
    client: Client,
}

impl StripePaymentGateway {
    /// Create a new gateway with its own HTTP client
    pub fn new(config: StripeConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Build form parameters for intent creation
    fn intent_form(request: &IntentRequest) -> Vec<(String, String)> {
        let mut form_params = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.clone()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        for (key, value) in &request.metadata {
            form_params.push((format!("metadata[{}]", key), value.clone()));
        }

        form_params
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
    }

    /// Send a request and decode a PaymentIntent, mapping failures
    async fn execute(&self, builder: RequestBuilder) -> GatewayResult<PaymentIntent> {
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));

            return Err(GatewayError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let intent: StripePaymentIntent = serde_json::from_str(&body).map_err(|e| {
            GatewayError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(intent.into())
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn create_intent(&self, request: &IntentRequest) -> GatewayResult<PaymentIntent> {
        if request.amount == 0 {
            return Err(GatewayError::InvalidRequest(
                "Amount must be positive".to_string(),
            ));
        }

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);
        let idempotency_key = Uuid::new_v4().to_string();

        debug!("Creating Stripe payment intent");

        let builder = self
            .authorized(self.client.post(&url))
            .header("Idempotency-Key", &idempotency_key)
            .form(&Self::intent_form(request));

        let intent = self.execute(builder).await?;

        info!(
            "Created Stripe payment intent: id={}, status={}",
            intent.id, intent.status
        );

        Ok(intent)
    }

    #[instrument(skip(self))]
    async fn retrieve_intent(&self, id: &str) -> GatewayResult<PaymentIntent> {
        if !is_valid_intent_id(id) {
            return Err(GatewayError::InvalidRequest(format!(
                "Malformed payment intent id: {:?}",
                id
            )));
        }

        let url = format!("{}/v1/payment_intents/{}", self.config.api_base_url, id);
        let intent = self.execute(self.authorized(self.client.get(&url))).await?;

        debug!("Retrieved Stripe payment intent: status={}", intent.status);

        Ok(intent)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

/// Intent ids are embedded in the request path
fn is_valid_intent_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    amount: u64,
    currency: String,
    status: String,
}

impl From<StripePaymentIntent> for PaymentIntent {
    fn from(intent: StripePaymentIntent) -> Self {
        PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: intent.currency,
            status: intent.status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_intent_form() {
        let request = IntentRequest {
            amount: 1500,
            currency: "usd".to_string(),
            metadata: BTreeMap::from([
                ("guests".to_string(), "2".to_string()),
                ("name".to_string(), "Ada".to_string()),
            ]),
        };

        let form = StripePaymentGateway::intent_form(&request);
        assert_eq!(form[0], ("amount".to_string(), "1500".to_string()));
        assert_eq!(form[1], ("currency".to_string(), "usd".to_string()));
        assert!(form.contains(&("metadata[name]".to_string(), "Ada".to_string())));
        assert!(form.contains(&("metadata[guests]".to_string(), "2".to_string())));
    }

    #[test]
    fn test_intent_id_validation() {
        assert!(is_valid_intent_id("pi_3MtwBwLkdIwHu7ix28a3tqPa"));
        assert!(!is_valid_intent_id(""));
        assert!(!is_valid_intent_id("pi_123/../../v1/customers"));
        assert!(!is_valid_intent_id("pi_123?expand=customer"));
    }
}
