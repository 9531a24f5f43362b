//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and shared read-only with every handler.

use std::env;
use tracing::warn;

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3000;

/// Placeholder verify token used when `VERIFY_TOKEN` is unset.
pub const DEFAULT_VERIFY_TOKEN: &str = "vibecode";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret expected in `hub.verify_token` during the handshake
    pub verify_token: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            verify_token: DEFAULT_VERIFY_TOKEN.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(env_var = "PORT", value = %raw, "Invalid port, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let verify_token = lookup("VERIFY_TOKEN")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VERIFY_TOKEN.to_string());

        Config { port, verify_token }
    }

    /// Whether a verify token other than the placeholder is configured.
    pub fn verify_token_set(&self) -> bool {
        self.verify_token != DEFAULT_VERIFY_TOKEN
    }
}
