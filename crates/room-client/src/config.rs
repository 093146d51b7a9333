//! Room client configuration.
//!
//! Loaded from environment variables by the embedding application.

use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on the TCP connect timeout when a request timeout is set.
pub const MAX_CONNECT_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the token service (e.g. `http://localhost:8081`).
    pub token_service_url: String,

    /// Base URL of the key service (e.g. `http://localhost:8082`).
    pub key_service_url: String,

    /// Media server URL handed to the room transport.
    pub room_url: String,

    /// Request timeout for token and key requests. Unset unless
    /// `HTTP_TIMEOUT_SECONDS` is given; token expiry is otherwise the only
    /// deadline on the join path.
    pub http_timeout: Option<Duration>,

    pub connect_timeout: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |name: &str| {
            vars.get(name)
                .map(|value| value.trim_end_matches('/').to_string())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let token_service_url = required("TOKEN_SERVICE_URL")?;
        let key_service_url = required("KEY_SERVICE_URL")?;
        let room_url = required("ROOM_URL")?;

        let http_timeout_seconds = vars
            .get("HTTP_TIMEOUT_SECONDS")
            .map(|value| {
                value.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                    ConfigError::InvalidValue(format!(
                        "HTTP_TIMEOUT_SECONDS must be a positive integer, got '{}'",
                        value
                    ))
                })
            })
            .transpose()?;

        Ok(ClientConfig {
            token_service_url,
            key_service_url,
            room_url,
            http_timeout: http_timeout_seconds.map(Duration::from_secs),
            connect_timeout: http_timeout_seconds
                .map(|seconds| Duration::from_secs(MAX_CONNECT_TIMEOUT_SECONDS.min(seconds))),
        })
    }
}
