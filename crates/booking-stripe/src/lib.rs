//! # booking-stripe
//!
//! Stripe payment gateway for the booking enquiry service.
//!
//! Creates and retrieves PaymentIntents through the Stripe REST API.
//! The client-side confirmation happens in the browser with the returned
//! `client_secret`; this crate only talks to Stripe from the server.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use booking_stripe::{StripeConfig, StripePaymentGateway};
//! use booking_core::{env_lookup, IntentRequest, PaymentGateway};
//!
//! // Payments are disabled when STRIPE_SECRET_KEY is unset
//! if let Some(config) = StripeConfig::from_lookup(env_lookup) {
//!     let gateway = StripePaymentGateway::new(config)?;
//!     let intent = gateway.create_intent(&request).await?;
//! }
//! ```

pub mod config;
pub mod gateway;

// Re-exports
pub use config::StripeConfig;
pub use gateway::StripePaymentGateway;
