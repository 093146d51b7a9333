//! Session token claims shared by the token service and its clients.
//!
//! The token service signs [`SessionClaims`] as an HS256 JWT. Clients never
//! hold the signing secret; they only [`peek_claims`] to learn when their
//! session credential stops being usable.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (denial-of-service prevention)
//! - Generic error messages prevent information leakage
//! - The `username` field is redacted in Debug output

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Session tokens are ~200 bytes. Anything larger is rejected before base64
/// decoding or signature verification.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Lifetime of a session token in seconds (1 hour).
pub const SESSION_TOKEN_TTL_SECONDS: i64 = 3600;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while inspecting a token.
///
/// Error messages are intentionally generic. Details are logged at debug level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("Invalid token")]
    TokenTooLarge,

    /// Token format is invalid (not a valid JWT structure).
    #[error("Invalid token")]
    MalformedToken,
}

// =============================================================================
// Claims Types
// =============================================================================

/// Claims carried by a session token.
///
/// A token proves that a session was granted to `username`; it does not
/// prove identity (no credential check happens at issuance).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username the session was granted to - redacted in Debug output.
    pub username: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("username", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

impl SessionClaims {
    /// Claims for `username` issued at `issued_at`, expiring one TTL later.
    #[must_use]
    pub fn new(username: String, issued_at: i64) -> Self {
        Self {
            username,
            iat: issued_at,
            exp: issued_at + SESSION_TOKEN_TTL_SECONDS,
        }
    }

    /// A token is live strictly before its expiry instant.
    #[must_use]
    pub fn is_live_at(&self, now: i64) -> bool {
        now < self.exp
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Read the claims of a JWT WITHOUT verifying its signature.
///
/// Clients use this to track the expiry of a token they were handed by the
/// token service. The result must never be used for an authorization
/// decision; that is what the token service's `/verify` is for.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `MalformedToken` - wrong structure, bad base64 or claims JSON
pub fn peek_claims(token: &str) -> Result<SessionClaims, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(
            target: "common.jwt",
            parts = parts.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    }

    let payload_part = parts.get(1).ok_or(JwtValidationError::MalformedToken)?;
    let payload_bytes = URL_SAFE_NO_PAD.decode(payload_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT payload base64");
        JwtValidationError::MalformedToken
    })?;

    serde_json::from_slice(&payload_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT claims JSON");
        JwtValidationError::MalformedToken
    })
}
