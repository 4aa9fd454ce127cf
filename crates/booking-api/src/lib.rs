//! # booking-api
//!
//! HTTP API layer for the booking enquiry service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Public payment configuration for the booking form
//! - Booking submission (deposit intent creation) and confirmation
//!   (intent re-check plus operator email)
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/config` | Publishable key, currency and deposit |
//! | POST | `/booking` | Submit or confirm an enquiry |
//! | OPTIONS | `/booking` | CORS preflight |

pub mod body;
pub mod handlers;
pub mod routes;
pub mod state;

pub use body::MAX_BODY_BYTES;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
