//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types
//! for session tokens, the token-signing secret and the shared media key.
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so any
//! struct deriving `Debug` that holds one of them is safe to log. Secrets are
//! zeroized when dropped, which is how a discarded session releases its token
//! and key material.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct JoinCredentials {
//!     username: String,
//!     token: SecretString,
//! }
//!
//! let creds = JoinCredentials {
//!     username: "alice".to_string(),
//!     token: SecretString::from("eyJhbGciOi..."),
//! };
//!
//! // Debug output redacts the token
//! println!("{:?}", creds);
//!
//! // Access requires an explicit call
//! let token: &str = creds.token.expose_secret();
//! # assert!(token.starts_with("eyJ"));
//! ```
//!
//! Use `SecretString` for session tokens and `SecretBox<Vec<u8>>` for binary
//! keys (the signing secret, the shared end-to-end key).

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Size of the shared end-to-end media key in bytes.
pub const SHARED_KEY_SIZE_BYTES: usize = 32;

/// Copy binary key material into a fresh `SecretBox`.
///
/// `SecretBox<Vec<u8>>` is intentionally not `Clone`; call sites that need a
/// second owned copy (for example a transport configuration) go through here.
#[must_use]
pub fn duplicate_bytes(secret: &SecretBox<Vec<u8>>) -> SecretBox<Vec<u8>> {
    SecretBox::new(Box::new(secret.expose_secret().clone()))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("hunter2");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("token-value");
        assert_eq!(secret.expose_secret(), "token-value");
    }

    #[test]
    fn test_binary_secret_debug_is_redacted() {
        let key = SecretBox::new(Box::new(vec![0xAB_u8; 32]));
        let debug_str = format!("{key:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("171"));
    }

    #[test]
    fn test_duplicate_bytes_copies_contents() {
        let key = SecretBox::new(Box::new(vec![7u8; 32]));
        let copy = duplicate_bytes(&key);

        assert_eq!(copy.expose_secret(), key.expose_secret());
    }

    #[test]
    fn test_deserialize() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct VerifyRequest {
            token: SecretString,
        }

        let json = r#"{"token": "my-secret-token"}"#;
        let req: VerifyRequest = serde_json::from_str(json).expect("deserialize");

        assert_eq!(req.token.expose_secret(), "my-secret-token");

        let debug = format!("{req:?}");
        assert!(!debug.contains("my-secret-token"));
        assert!(debug.contains("REDACTED"));
    }
}
