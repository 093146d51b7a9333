//! Room client error types.

use thiserror::Error;

/// Errors surfaced to callers of the session orchestrator.
///
/// Every variant except `Internal` is terminal for the operation that
/// produced it and leaves no session state behind.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The token service refused or failed to issue a token.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The shared encryption key could not be obtained.
    #[error("Encryption key unavailable: {0}")]
    KeyUnavailable(String),

    /// The media transport failed to connect or to start local media.
    #[error("Transport failed: {0}")]
    TransportFailed(#[from] TransportError),

    /// A session is already live on this orchestrator.
    #[error("Already joined room {0}")]
    AlreadyJoined(String),

    /// Orchestrator task is gone or did not respond.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure reported by a [`RoomTransport`](crate::transport::RoomTransport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("local media failed: {0}")]
    Media(String),
}

/// Failure obtaining a token or the shared key from the backing services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The service answered with a client error (4xx).
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
