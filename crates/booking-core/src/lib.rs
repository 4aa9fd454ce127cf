//! # booking-core
//!
//! Core types and traits for the booking enquiry service.
//!
//! This crate provides:
//! - `Configuration` for the public payment settings
//! - `BookingPayload` and its validation
//! - `PaymentGateway` trait for payment processors
//! - `Notifier` and the `MailTransport` trait for operator emails
//! - `Money` for minor-unit amounts and display formatting
//! - `BookingError`, `GatewayError` and `MailError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use booking_core::{BookingPayload, Configuration, IntentRequest};
//!
//! let config = Configuration::from_env();
//! let payload = BookingPayload::from_value(body)?;
//! payload.validate()?;
//!
//! if config.payment_required() {
//!     let intent = gateway.create_intent(&IntentRequest::for_booking(&payload, &config)).await?;
//! }
//! ```

pub mod booking;
pub mod config;
pub mod error;
pub mod money;
pub mod notification;
pub mod payment;

// Re-exports for convenience
pub use booking::{BookingAction, BookingPayload, STATUS_NOT_CHARGED, STATUS_PAYMENT_PENDING};
pub use config::{env_lookup, Configuration};
pub use error::{BookingError, GatewayError, GatewayResult, MailError};
pub use money::Money;
pub use notification::{MailTransport, NotificationEmail, Notifier};
pub use payment::{BoxedPaymentGateway, IntentRequest, PaymentGateway, PaymentIntent};
