//! # Body Parsing
//!
//! Reads a booking request body into a `BookingPayload`, capping how much
//! is buffered.

use axum::body::Body;
use booking_core::{BookingError, BookingPayload};
use futures::TryStreamExt;
use serde_json::Value;

/// Hard cap on buffered request bytes
pub const MAX_BODY_BYTES: usize = 1_000_000;

/// A request body, either still streaming or already decoded upstream
pub enum RequestBody {
    Parsed(Value),
    Raw(Body),
}

impl From<Body> for RequestBody {
    fn from(body: Body) -> Self {
        RequestBody::Raw(body)
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Parsed(value)
    }
}

/// Parse a booking payload.
///
/// An empty body is treated as `{}`. Reading stops as soon as the cap is
/// exceeded; the unread remainder is dropped with the body.
pub async fn parse_body(body: RequestBody) -> Result<BookingPayload, BookingError> {
    let value = match body {
        RequestBody::Parsed(value) => value,
        RequestBody::Raw(body) => {
            let bytes = read_capped(body, MAX_BODY_BYTES).await?;
            decode_json(&bytes)?
        }
    };

    BookingPayload::from_value(value)
}

async fn read_capped(body: Body, limit: usize) -> Result<Vec<u8>, BookingError> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream
        .try_next()
        .await
        .map_err(|e| BookingError::InvalidBody {
            detail: format!("body read failed: {}", e),
        })?
    {
        if buf.len() + chunk.len() > limit {
            return Err(BookingError::PayloadTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

fn decode_json(bytes: &[u8]) -> Result<Value, BookingError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_slice(bytes).map_err(|e| BookingError::InvalidBody {
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        let payload = parse_body(Body::empty().into()).await.unwrap();
        assert!(payload.name.is_none());

        let payload = parse_body(Body::from("  \n").into()).await.unwrap();
        assert!(payload.email.is_none());
    }

    #[tokio::test]
    async fn test_json_body() {
        let body = Body::from(r#"{"name":"Ada","guests":4}"#);
        let payload = parse_body(body.into()).await.unwrap();
        assert_eq!(payload.name.as_deref(), Some("Ada"));
        assert_eq!(payload.guests.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_pre_parsed_value_used_directly() {
        let payload = parse_body(json!({ "action": "confirm" }).into()).await.unwrap();
        assert_eq!(payload.action.as_deref(), Some("confirm"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_body() {
        let result = parse_body(Body::from("{\"name\":").into()).await;
        assert!(matches!(result, Err(BookingError::InvalidBody { .. })));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let body = Body::from(vec![b' '; MAX_BODY_BYTES + 1]);
        let result = parse_body(body.into()).await;
        assert!(matches!(
            result,
            Err(BookingError::PayloadTooLarge { limit: MAX_BODY_BYTES })
        ));
    }

    #[tokio::test]
    async fn test_chunked_body_accumulates() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"name\":")),
            Ok(Bytes::from_static(b"\"Ada\"}")),
        ];
        let body = Body::from_stream(futures::stream::iter(chunks));

        let payload = parse_body(body.into()).await.unwrap();
        assert_eq!(payload.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_chunked_body_over_cap_stops_early() {
        let chunk = Bytes::from(vec![b'a'; MAX_BODY_BYTES / 2 + 1]);
        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Ok(chunk.clone()), Ok(chunk.clone()), Ok(chunk)];
        let body = Body::from_stream(futures::stream::iter(chunks));

        let result = parse_body(body.into()).await;
        assert!(matches!(result, Err(BookingError::PayloadTooLarge { .. })));
    }
}
