//! # booking-enquiry
//!
//! Booking enquiry backend with optional card deposits.
//!
//! ## Usage
//!
//! ```bash
//! # Payments (optional)
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_PUBLISHABLE_KEY=pk_test_...
//! export DEPOSIT_AMOUNT=1500
//!
//! # Operator notifications (optional)
//! export SMTP_HOST=smtp.example.com SMTP_USER=... SMTP_PASS=...
//! export BOOKING_NOTIFY_TO=owner@example.com BOOKING_NOTIFY_FROM=bookings@example.com
//!
//! booking-enquiry
//! ```

use booking_api::{
    routes,
    state::{AppConfig, AppState},
};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if AppConfig::from_env().is_production() {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    print_banner();

    let state = AppState::from_env()?;

    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!("Currency: {}", state.settings.currency());
    info!("Payment required: {}", state.settings.payment_required());
    if let Some(gateway) = state.gateway.as_ref() {
        info!("Payment provider: {}", gateway.provider_name());
    }
    if state.notifications_enabled() {
        info!("Booking notifications enabled");
    } else {
        warn!("Mail settings incomplete, booking notifications disabled");
    }

    let is_prod = state.config.is_production();
    let app = routes::create_router(state);

    info!("Booking enquiry service starting on http://{}", addr);

    if !is_prod {
        info!("Config: GET http://{}/config", addr);
        info!("Booking: POST http://{}/booking", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Booking Enquiry
  ━━━━━━━━━━━━━━━━━━━━━━━
  Enquiries and deposits
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
