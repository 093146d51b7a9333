use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

use crate::services::key_provider::KEY_SIZE_BYTES;
use common::secret::SecretBox;

/// Default listen address when `BIND_ADDRESS` is unset.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8082";

#[derive(Debug)]
pub struct Config {
    pub bind_address: String,
    /// Pre-provisioned shared key. `None` means a fresh key is generated at
    /// startup and lives only as long as the process.
    pub shared_key: Option<SecretBox<Vec<u8>>>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid shared key format: {0}")]
    InvalidSharedKey(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),
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

        let shared_key = match vars.get("SHARED_KEY") {
            Some(encoded) => {
                let key = general_purpose::STANDARD
                    .decode(encoded.trim())
                    .map_err(ConfigError::Base64Error)?;

                if key.len() != KEY_SIZE_BYTES {
                    return Err(ConfigError::InvalidSharedKey(format!(
                        "Expected {} bytes, got {}",
                        KEY_SIZE_BYTES,
                        key.len()
                    )));
                }

                Some(SecretBox::new(Box::new(key)))
            }
            None => None,
        };

        Ok(Config {
            bind_address,
            shared_key,
        })
    }
}
