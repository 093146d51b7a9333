//! Builder patterns for test data construction
//!
//! Provides a fluent API for signing session tokens with arbitrary claims.

use crate::crypto_fixtures::TEST_JWT_SECRET;
use chrono::Utc;
use common::jwt::{SessionClaims, SESSION_TOKEN_TTL_SECONDS};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// Builder for creating signed test session tokens
///
/// # Example
/// ```rust,ignore
/// let expired = TestTokenBuilder::new()
///     .for_user("alice")
///     .expired_seconds_ago(60)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    username: String,
    iat: i64,
    exp: i64,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults (valid for one hour from now)
    pub fn new() -> Self {
        let now = Utc::now().timestamp();
        Self {
            username: "test-user".to_string(),
            iat: now,
            exp: now + SESSION_TOKEN_TTL_SECONDS,
        }
    }

    /// Set the username
    pub fn for_user(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    /// Make the token expire `seconds` in the past
    pub fn expired_seconds_ago(mut self, seconds: i64) -> Self {
        self.exp = Utc::now().timestamp() - seconds;
        self.iat = self.exp - SESSION_TOKEN_TTL_SECONDS;
        self
    }

    /// Build the claims without signing
    pub fn build(&self) -> SessionClaims {
        SessionClaims {
            username: self.username.clone(),
            iat: self.iat,
            exp: self.exp,
        }
    }

    /// Sign with the test secret
    pub fn sign(&self) -> String {
        self.sign_with(TEST_JWT_SECRET)
    }

    /// Sign with an arbitrary HMAC secret
    pub fn sign_with(&self, secret: &[u8]) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        encode(&header, &self.build(), &EncodingKey::from_secret(secret))
            .expect("Failed to sign test token")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::jwt::peek_claims;

    #[test]
    fn test_builder_creates_valid_claims() {
        let claims = TestTokenBuilder::new().for_user("alice").build();

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, SESSION_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_expired_token_claims() {
        let token = TestTokenBuilder::new().expired_seconds_ago(60).sign();
        let claims = peek_claims(&token).unwrap();

        assert!(!claims.is_live_at(Utc::now().timestamp()));
    }
}
