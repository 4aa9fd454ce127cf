//! # Request Handlers
//!
//! Axum request handlers for the configuration and booking endpoints.
//! Both check the method themselves so a rejected method still gets a JSON
//! error body alongside the `Allow` header.

use crate::body::{parse_body, RequestBody};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use booking_core::{
    BookingAction, BookingError, BookingPayload, Configuration, GatewayError, IntentRequest,
    STATUS_NOT_CHARGED, STATUS_PAYMENT_PENDING,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

/// Reported when a confirm-flow intent lookup fails
const UNKNOWN_STATUS: &str = "unknown";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Public payment configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfigResponse {
    pub publishable_key: Option<String>,
    pub payment_required: bool,
    pub currency: String,
    pub deposit_amount: u64,
}

impl From<&Configuration> for PublicConfigResponse {
    fn from(config: &Configuration) -> Self {
        Self {
            publishable_key: config.publishable_key().map(String::from),
            payment_required: config.payment_required(),
            currency: config.currency().to_string(),
            deposit_amount: config.deposit_amount(),
        }
    }
}

/// Payment intent details handed to the browser
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSummary {
    pub client_secret: Option<String>,
    pub id: String,
    pub amount: u64,
    pub currency: String,
}

/// Submit flow response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub payment_required: bool,
    pub payment: Option<IntentSummary>,
}

/// Intent status as seen during confirmation
#[derive(Debug, Serialize)]
pub struct PaymentState {
    pub id: String,
    pub status: String,
}

/// Confirm flow response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_error: Option<bool>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

fn booking_error_to_response(err: &BookingError) -> Response {
    match err {
        BookingError::PaymentUnavailable(source) => {
            error!(kind = err.kind(), error = %source, "Failed to create payment intent");
        }
        BookingError::InvalidBody { detail } => {
            warn!(kind = err.kind(), detail = %detail, "Rejected booking body");
        }
        BookingError::PayloadTooLarge { limit } => {
            warn!(kind = err.kind(), limit, "Booking body exceeded size limit");
        }
        BookingError::MissingFields(fields) => {
            debug!(kind = err.kind(), missing = %fields.join(", "), "Booking enquiry incomplete");
        }
        BookingError::MethodNotAllowed { allow } => {
            debug!(kind = err.kind(), allow = *allow, "Method not allowed");
        }
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(ErrorResponse::new(err.to_string()))).into_response();

    if let BookingError::MethodNotAllowed { allow } = err {
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static(*allow));
    }

    response
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "booking-enquiry",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Public payment configuration (`GET /config`)
pub async fn config(State(state): State<AppState>, method: Method) -> Response {
    if method != Method::GET {
        return booking_error_to_response(&BookingError::MethodNotAllowed { allow: "GET" });
    }

    Json(PublicConfigResponse::from(state.settings.as_ref())).into_response()
}

/// Booking enquiry endpoint (`POST /booking`, `OPTIONS /booking`)
#[instrument(skip_all, fields(method = %method))]
pub async fn booking(State(state): State<AppState>, method: Method, body: Body) -> Response {
    let mut response = match method {
        Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
        Method::POST => match handle_booking(&state, body.into()).await {
            Ok(response) => response,
            Err(err) => booking_error_to_response(&err),
        },
        _ => booking_error_to_response(&BookingError::MethodNotAllowed { allow: "POST" }),
    };

    apply_cors(response.headers_mut(), &state.config.allowed_origin);
    response
}

async fn handle_booking(state: &AppState, body: RequestBody) -> Result<Response, BookingError> {
    let payload = parse_body(body).await?;

    match payload.action() {
        BookingAction::Confirm => Ok(confirm_booking(state, payload).await.into_response()),
        BookingAction::Submit => Ok(submit_booking(state, payload).await?.into_response()),
    }
}

/// Validate the enquiry and, when payment is required, create the deposit intent
async fn submit_booking(
    state: &AppState,
    payload: BookingPayload,
) -> Result<Json<SubmitResponse>, BookingError> {
    payload.validate()?;

    let settings = state.settings.as_ref();
    if !settings.payment_required() {
        info!("Booking enquiry accepted without payment");
        return Ok(Json(SubmitResponse {
            success: true,
            payment_required: false,
            payment: None,
        }));
    }

    let gateway = state.gateway.as_ref().ok_or_else(|| {
        BookingError::PaymentUnavailable(GatewayError::Configuration(
            "payment required but no gateway configured".to_string(),
        ))
    })?;

    let request = IntentRequest::for_booking(&payload, settings);
    let intent = gateway
        .create_intent(&request)
        .await
        .map_err(BookingError::PaymentUnavailable)?;

    info!(
        provider = gateway.provider_name(),
        intent_id = %intent.id,
        "Booking enquiry awaiting deposit"
    );

    Ok(Json(SubmitResponse {
        success: true,
        payment_required: true,
        payment: Some(IntentSummary {
            client_secret: intent.client_secret,
            id: intent.id,
            amount: intent.amount,
            currency: intent.currency,
        }),
    }))
}

/// Re-check the intent (if any), then notify the operator
async fn confirm_booking(state: &AppState, mut payload: BookingPayload) -> Json<ConfirmResponse> {
    let intent_id = payload
        .payment_intent_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from);

    let payment = match intent_id {
        Some(id) => {
            let retrieved = match state.gateway.as_ref() {
                Some(gateway) => gateway.retrieve_intent(&id).await,
                None => Err(GatewayError::Configuration(
                    "no payment gateway configured".to_string(),
                )),
            };

            match retrieved {
                Ok(intent) => {
                    payload.payment_status = Some(intent.status.clone());
                    Some(PaymentState {
                        id: intent.id,
                        status: intent.status,
                    })
                }
                Err(e) => {
                    warn!(intent_id = %id, error = %e, "Could not retrieve payment intent");
                    // An unverified client status must not reach the operator
                    payload.payment_status = None;
                    Some(PaymentState {
                        id,
                        status: UNKNOWN_STATUS.to_string(),
                    })
                }
            }
        }
        None => None,
    };

    let status_unset = payload
        .payment_status
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true);
    if status_unset {
        let fallback = if state.settings.payment_required() {
            STATUS_PAYMENT_PENDING
        } else {
            STATUS_NOT_CHARGED
        };
        payload.payment_status = Some(fallback.to_string());
    }

    let mail_error = match state.notifier.as_ref() {
        Some(notifier) => match notifier.send(&payload, &state.settings.deposit()).await {
            Ok(()) => None,
            Err(e) => {
                error!(error = %e, "Failed to send booking notification");
                Some(true)
            }
        },
        None => {
            debug!("Notifications disabled, skipping booking email");
            None
        }
    };

    Json(ConfirmResponse {
        success: true,
        payment,
        mail_error,
    })
}

fn apply_cors(headers: &mut HeaderMap, allowed_origin: &str) {
    let origin =
        HeaderValue::from_str(allowed_origin).unwrap_or_else(|_| HeaderValue::from_static("*"));

    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logs_for(err: &BookingError) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            booking_error_to_response(err);
        });

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_missing_fields_logged_as_field() {
        let err = BookingError::MissingFields(vec!["email".to_string(), "guests".to_string()]);
        let output = logs_for(&err);
        assert!(output.contains("missing=email, guests"), "{}", output);
        assert!(output.contains("kind=\"invalid_request\""), "{}", output);
    }

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error");
        assert_eq!(err.error, "Test error");
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response =
            booking_error_to_response(&BookingError::MethodNotAllowed { allow: "GET" });
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }

    #[test]
    fn test_gateway_error_is_500() {
        let err = BookingError::PaymentUnavailable(GatewayError::Network("reset".into()));
        let response = booking_error_to_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::ALLOW).is_none());
    }

    #[test]
    fn test_public_config_serialization() {
        let config = Configuration::new(None, false, "usd", 0);
        let value = serde_json::to_value(PublicConfigResponse::from(&config)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "publishableKey": null,
                "paymentRequired": false,
                "currency": "usd",
                "depositAmount": 0
            })
        );
    }

    #[test]
    fn test_confirm_response_omits_absent_fields() {
        let value = serde_json::to_value(ConfirmResponse {
            success: true,
            payment: None,
            mail_error: None,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "success": true }));
    }

    #[test]
    fn test_cors_headers() {
        let mut headers = HeaderMap::new();
        apply_cors(&mut headers, "https://stay.example.com");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://stay.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");

        let mut headers = HeaderMap::new();
        apply_cors(&mut headers, "bad\nvalue");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
