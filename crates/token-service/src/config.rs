use common::secret::SecretBox;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Minimum length of the HS256 signing secret in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Default bind address for the token service.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8081";

/// Token service configuration.
///
/// The signing secret is created once at process bootstrap and handed to
/// `TokenService` by value; nothing else holds it.
#[derive(Debug)]
pub struct Config {
    pub bind_address: String,
    pub jwt_secret: SecretBox<Vec<u8>>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_JWT_SECRET_LENGTH,
                jwt_secret.len()
            )));
        }

        Ok(Config {
            bind_address,
            jwt_secret: SecretBox::new(Box::new(jwt_secret.as_bytes().to_vec())),
        })
    }
}
