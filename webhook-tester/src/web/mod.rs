//! Web server module for the webhook endpoint.
//!
//! This module provides a single router that:
//! - Answers the `hub.*` subscription handshake on `GET /`
//! - Logs and acknowledges webhook events on `POST /`
//! - Reports status on `GET /health`

pub mod handlers;
pub mod page;
pub mod verification;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::Config;

pub use handlers::{
    health, parse_event_body, redact_headers, verify_or_info, webhook_event, AppState,
    HealthResponse, MalformedBody, WebhookResponse,
};
pub use page::render_info_page;
pub use verification::{VerificationError, VerificationRequest};

/// Build the application router with the given configuration.
pub fn router(config: Config) -> Router {
    Router::new()
        .route("/", get(verify_or_info).post(webhook_event))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(config))
}
