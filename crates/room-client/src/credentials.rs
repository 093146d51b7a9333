//! Token and shared-key acquisition.
//!
//! The orchestrator asks a [`CredentialProvider`] for a session token and
//! the shared media key before connecting. [`HttpCredentialProvider`] talks
//! to the token and key services over HTTP.

use crate::config::ClientConfig;
use crate::errors::CredentialError;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use common::secret::{SecretBox, SecretString, SHARED_KEY_SIZE_BYTES};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Obtain a session token for `username`.
    async fn issue_token(&self, username: &str) -> Result<SecretString, CredentialError>;

    /// Obtain the shared end-to-end encryption key.
    async fn fetch_key(&self) -> Result<SecretBox<Vec<u8>>, CredentialError>;
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct KeyResponse {
    key: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the token and key services.
pub struct HttpCredentialProvider {
    http_client: reqwest::Client,
    token_service_url: String,
    key_service_url: String,
}

impl HttpCredentialProvider {
    pub fn new(config: &ClientConfig) -> Result<Self, CredentialError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| {
                CredentialError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            token_service_url: config.token_service_url.clone(),
            key_service_url: config.key_service_url.clone(),
        })
    }
}

#[async_trait]
impl CredentialProvider for HttpCredentialProvider {
    #[instrument(skip_all, name = "room.credentials.token")]
    async fn issue_token(&self, username: &str) -> Result<SecretString, CredentialError> {
        let url = format!("{}/token", self.token_service_url);
        debug!(target: "room.credentials", url = %url, "Requesting session token");

        let response = self
            .http_client
            .post(&url)
            .json(&TokenRequest { username })
            .send()
            .await
            .map_err(|e| {
                debug!(target: "room.credentials", error = %e, "HTTP request failed");
                CredentialError::Http(e.to_string())
            })?;

        let response = check_status(response).await?;
        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!(target: "room.credentials", error = %e, "Failed to parse token response");
            CredentialError::InvalidResponse(e.to_string())
        })?;

        if body.token.is_empty() {
            return Err(CredentialError::InvalidResponse("Token is empty".to_string()));
        }

        debug!(target: "room.credentials", "Session token acquired");
        Ok(SecretString::from(body.token))
    }

    #[instrument(skip_all, name = "room.credentials.key")]
    async fn fetch_key(&self) -> Result<SecretBox<Vec<u8>>, CredentialError> {
        let url = format!("{}/key", self.key_service_url);
        debug!(target: "room.credentials", url = %url, "Requesting shared key");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            debug!(target: "room.credentials", error = %e, "HTTP request failed");
            CredentialError::Http(e.to_string())
        })?;

        let response = check_status(response).await?;
        let body: KeyResponse = response.json().await.map_err(|e| {
            warn!(target: "room.credentials", error = %e, "Failed to parse key response");
            CredentialError::InvalidResponse(e.to_string())
        })?;

        let key = general_purpose::STANDARD
            .decode(body.key)
            .map_err(|e| CredentialError::InvalidResponse(format!("Key is not base64: {e}")))?;

        if key.len() != SHARED_KEY_SIZE_BYTES {
            return Err(CredentialError::InvalidResponse(format!(
                "Expected {} byte key, got {}",
                SHARED_KEY_SIZE_BYTES,
                key.len()
            )));
        }

        debug!(target: "room.credentials", "Shared key acquired");
        Ok(SecretBox::new(Box::new(key)))
    }
}

/// Map non-success statuses to errors, surfacing the service's `error`
/// message for client errors.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CredentialError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.is_client_error() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        warn!(target: "room.credentials", status = %status, "Request rejected");
        return Err(CredentialError::Rejected(message));
    }

    warn!(target: "room.credentials", status = %status, "Unexpected response status");
    Err(CredentialError::Http(format!("Unexpected status {status}")))
}
