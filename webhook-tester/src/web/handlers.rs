//! Webhook endpoint handlers.
//!
//! Every handler completes synchronously relative to its request:
//! 1. `GET /` answers the subscription handshake or serves the landing page
//! 2. `POST /` logs the event and acknowledges it
//! 3. `GET /health` reports status and configuration

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::web::page::render_info_page;
use crate::web::verification::VerificationRequest;
use crate::Config;

/// Service identifier reported by the health endpoint.
pub const SERVICE_NAME: &str = "whatsapp-webhook-tester";

/// Replacement for the `authorization` header value in logs.
pub const REDACTED: &str = "[HIDDEN]";

/// Line framing each logged webhook event.
pub const SEPARATOR: &str = "==================================================";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// ISO-8601 timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Human-readable receipt timestamp, e.g. `2024-05-01 12:00:00`.
pub fn receipt_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

// =============================================================================
// Verification / Landing Page
// =============================================================================

/// Root GET endpoint.
///
/// With all of `hub.mode`, `hub.challenge` and `hub.verify_token` present this
/// performs the handshake: 200 with the challenge echoed, or 403 with an empty
/// body. Otherwise it serves the HTML landing page.
pub async fn verify_or_info(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let Some(request) = VerificationRequest::from_query(query.as_deref()) else {
        return Html(render_info_page(&state.config)).into_response();
    };

    info!(
        mode = %request.mode,
        challenge = %request.challenge,
        token = %request.token,
        verify_token = %state.config.verify_token,
        "webhook_verification_attempt"
    );

    match request.verify(&state.config.verify_token) {
        Ok(challenge) => {
            info!("webhook_verified");
            (StatusCode::OK, Html(challenge.to_string())).into_response()
        }
        Err(e) => {
            warn!(reason = %e, "webhook_verification_failed");
            e.into_response()
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub verify_token_set: bool,
    pub verify_token: String,
    pub port: u16,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: iso_timestamp(Utc::now()),
        verify_token_set: state.config.verify_token_set(),
        verify_token: state.config.verify_token.clone(),
        port: state.config.port,
    })
}

// =============================================================================
// Webhook Events
// =============================================================================

/// Webhook acknowledgment.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
    pub received_at: String,
}

/// Copy request headers into a JSON map, hiding the `authorization` value.
///
/// Repeated headers are joined with `", "`.
pub fn redact_headers(headers: &HeaderMap) -> Map<String, Value> {
    let mut safe = Map::new();

    for name in headers.keys() {
        let key = name.as_str();
        let value = if key == "authorization" {
            REDACTED.to_string()
        } else {
            headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        };
        safe.insert(key.to_string(), Value::String(value));
    }

    safe
}

/// A JSON-typed request body that does not parse.
#[derive(Debug, Error)]
#[error("Failed to parse the request body as JSON: {0}")]
pub struct MalformedBody(#[from] serde_json::Error);

impl IntoResponse for MalformedBody {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Whether the request declares a JSON body (`application/json` or `+json`).
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Decode an event body.
///
/// Only JSON-typed, non-empty bodies are parsed; anything else is treated
/// as an empty object.
pub fn parse_event_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, MalformedBody> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Root POST endpoint.
///
/// Any payload is acknowledged. Only a JSON-typed body that fails to parse
/// is refused with 400.
pub async fn webhook_event(headers: HeaderMap, body: Bytes) -> Response {
    let body = match parse_event_body(&headers, &body) {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "webhook_body_malformed");
            return e.into_response();
        }
    };

    let received_at = receipt_timestamp(Utc::now());

    let safe_headers = Value::Object(redact_headers(&headers));
    let headers_json = serde_json::to_string_pretty(&safe_headers).unwrap_or_default();
    let body_json = serde_json::to_string_pretty(&body).unwrap_or_default();

    info!(received_at = %received_at, "webhook_received");
    info!("{}", SEPARATOR);
    info!(headers = %headers_json, "webhook_headers");
    info!(body = %body_json, "webhook_body");
    info!("{}", SEPARATOR);

    Json(WebhookResponse {
        success: true,
        message: "Webhook received",
        timestamp: iso_timestamp(Utc::now()),
        received_at,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_formats() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap();
        assert_eq!(iso_timestamp(at), "2024-05-01T12:34:56.000Z");
        assert_eq!(receipt_timestamp(at), "2024-05-01 12:34:56");
    }

    #[test]
    fn test_redact_headers_hides_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("secret123"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let safe = redact_headers(&headers);
        assert_eq!(safe["authorization"], REDACTED);
        assert_eq!(safe["content-type"], "application/json");
    }

    #[test]
    fn test_redact_headers_without_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert("x-hub-signature", HeaderValue::from_static("sha1=abc"));

        let safe = redact_headers(&headers);
        assert_eq!(safe.len(), 1);
        assert_eq!(safe["x-hub-signature"], "sha1=abc");
    }

    #[test]
    fn test_redact_headers_joins_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));

        let safe = redact_headers(&headers);
        assert_eq!(safe["x-forwarded-for"], "10.0.0.1, 10.0.0.2");
    }

    #[test]
    fn test_parse_event_body_by_content_type() {
        let mut json = HeaderMap::new();
        json.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert_eq!(parse_event_body(&json, br#"{"a":1}"#).unwrap()["a"], 1);
        assert_eq!(parse_event_body(&json, b"").unwrap(), Value::Object(Map::new()));
        assert!(parse_event_body(&json, b"{not json").is_err());

        let mut form = HeaderMap::new();
        form.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert_eq!(
            parse_event_body(&form, br#"{"a":1}"#).unwrap(),
            Value::Object(Map::new())
        );
        assert_eq!(
            parse_event_body(&HeaderMap::new(), b"{not json").unwrap(),
            Value::Object(Map::new())
        );
    }

    #[test]
    fn test_json_suffix_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.api+json"),
        );
        assert!(is_json_content_type(&headers));
    }

    #[tokio::test]
    async fn test_health_reports_config() {
        let state = AppState::new(Config {
            port: 9000,
            verify_token: "custom".to_string(),
        });

        let Json(resp) = health(State(state)).await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.service, SERVICE_NAME);
        assert!(resp.verify_token_set);
        assert_eq!(resp.verify_token, "custom");
        assert_eq!(resp.port, 9000);
        assert!(resp.timestamp.ends_with('Z'));
    }
}
