//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for session tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use common::jwt::SessionClaims;
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Custom assertions for issued session tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_user("alice")
///     .assert_expires_in(3600);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a structurally valid HS256 JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token was issued for the specified username
    fn assert_for_user(&self, username: &str) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: i64) -> &Self;
}

fn decode_part<T: for<'de> Deserialize<'de>>(token: &str, index: usize) -> T {
    let part = token
        .split('.')
        .nth(index)
        .expect("JWT is missing a part");
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .expect("JWT part is not base64url");
    serde_json::from_slice(&bytes).expect("JWT part is not the expected JSON")
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts = self.split('.').count();
        assert_eq!(
            parts, 3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts
        );

        let header: JwtHeader = decode_part(self, 0);
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let _claims: SessionClaims = decode_part(self, 1);
        self
    }

    fn assert_for_user(&self, username: &str) -> &Self {
        let claims: SessionClaims = decode_part(self, 1);
        assert_eq!(
            claims.username, username,
            "Expected username '{}', got '{}'",
            username, claims.username
        );
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims: SessionClaims = decode_part(self, 1);
        let expires_in = claims.exp - chrono::Utc::now().timestamp();

        // Allow 5-second tolerance for slow test machines
        assert!(
            (expires_in - seconds).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );
        self
    }
}
