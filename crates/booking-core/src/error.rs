//! # Error Types
//!
//! Typed error handling for the booking enquiry service.
//! Client-visible messages come from `Display`; provider and transport
//! details ride along in fields and are only ever logged.

use thiserror::Error;

/// Errors that terminate a booking request with a non-2xx response
#[derive(Debug, Error)]
pub enum BookingError {
    /// HTTP method not supported by the endpoint
    #[error("Method not allowed")]
    MethodNotAllowed { allow: &'static str },

    /// Body could not be read or decoded
    #[error("Invalid JSON body")]
    InvalidBody { detail: String },

    /// Body exceeded the read cap
    #[error("Invalid JSON body")]
    PayloadTooLarge { limit: usize },

    /// Required booking fields absent or blank
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Payment intent could not be created
    #[error("Unable to initiate payment")]
    PaymentUnavailable(#[source] GatewayError),
}

impl BookingError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            BookingError::MethodNotAllowed { .. } => 405,
            BookingError::InvalidBody { .. } => 400,
            BookingError::PayloadTooLarge { .. } => 400,
            BookingError::MissingFields(_) => 400,
            BookingError::PaymentUnavailable(_) => 500,
        }
    }

    /// Short machine-readable tag, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::MethodNotAllowed { .. }
            | BookingError::InvalidBody { .. }
            | BookingError::PayloadTooLarge { .. }
            | BookingError::MissingFields(_) => "invalid_request",
            BookingError::PaymentUnavailable(_) => "gateway",
        }
    }
}

/// Failures talking to the payment processor
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Gateway could not be constructed or is not configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request rejected before reaching the processor
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Processor answered with an error status
    #[error("Provider error [{status}]: {message}")]
    Provider { status: u16, message: String },

    /// Network/HTTP error communicating with the processor
    #[error("Network error: {0}")]
    Network(String),

    /// Processor response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures composing or delivering a notification email
#[derive(Debug, Error)]
pub enum MailError {
    /// Sender, recipient or reply-to address did not parse
    #[error("Invalid address: {0}")]
    Address(String),

    /// Message could not be assembled
    #[error("Message build failed: {0}")]
    Build(String),

    /// Transport could not be set up or the relay refused the message
    #[error("Transport error: {0}")]
    Transport(String),
}
