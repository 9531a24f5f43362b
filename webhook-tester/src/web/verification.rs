//! Webhook subscription handshake.
//!
//! Meta verifies a callback URL by sending `hub.mode`, `hub.challenge` and
//! `hub.verify_token` as query parameters. The endpoint proves control by
//! echoing the challenge when the mode is `subscribe` and the token matches.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use url::form_urlencoded;

/// Only mode accepted for a subscription handshake.
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// The three handshake parameters, all present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub mode: String,
    pub challenge: String,
    pub token: String,
}

impl VerificationRequest {
    /// Extract the handshake parameters from a raw query string.
    ///
    /// Returns `None` when any parameter is missing or empty. The first
    /// occurrence of a repeated key wins.
    pub fn from_query(query: Option<&str>) -> Option<Self> {
        let query = query?;

        let mut mode = None;
        let mut challenge = None;
        let mut token = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "hub.mode" => &mut mode,
                "hub.challenge" => &mut challenge,
                "hub.verify_token" => &mut token,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        Some(VerificationRequest {
            mode: present(mode)?,
            challenge: present(challenge)?,
            token: present(token)?,
        })
    }

    /// Check the handshake against the configured secret.
    ///
    /// On success returns the challenge to echo back unchanged.
    pub fn verify(&self, expected_token: &str) -> Result<&str, VerificationError> {
        if self.mode != SUBSCRIBE_MODE {
            return Err(VerificationError::UnsupportedMode(self.mode.clone()));
        }
        if self.token != expected_token {
            return Err(VerificationError::TokenMismatch);
        }
        Ok(&self.challenge)
    }
}

/// Reasons a handshake is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("unsupported hub.mode: {0}")]
    UnsupportedMode(String),

    #[error("verify token does not match")]
    TokenMismatch,
}

impl IntoResponse for VerificationError {
    fn into_response(self) -> Response {
        StatusCode::FORBIDDEN.into_response()
    }
}
