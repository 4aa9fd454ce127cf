//! # Routes
//!
//! Axum router configuration for the booking enquiry service.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// Routes:
/// - GET /health - Liveness check
/// - GET /config - Public payment configuration
/// - POST /booking - Submit or confirm an enquiry
/// - OPTIONS /booking - CORS preflight
///
/// `/config` and `/booking` accept any method and answer unsupported ones
/// with a JSON 405 themselves.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/config", any(handlers::config))
        .route("/booking", any(handlers::booking))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
