//! WhatsApp Webhook Tester - minimal webhook endpoint.
//!
//! Serves three routes on a single listener:
//! - `GET /`: webhook verification handshake, or an HTML landing page
//! - `POST /`: webhook event intake (logged, then acknowledged)
//! - `GET /health`: status and configuration
//!
//! Configuration is read once from `PORT` and `VERIFY_TOKEN`.

pub mod config;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use web::{router, AppState};
