//! Shared media encryption key.
//!
//! One key per process, created at bootstrap and never rotated. Every caller
//! of [`KeyProvider::fetch`] receives the same `Arc`, so the key material is
//! held in exactly one allocation and zeroized when the last holder drops it.

use crate::errors::KeyServiceError;
use common::secret::{ExposeSecret, SecretBox, SHARED_KEY_SIZE_BYTES};
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;
use std::sync::Arc;

/// Size of the shared key in bytes.
pub const KEY_SIZE_BYTES: usize = SHARED_KEY_SIZE_BYTES;

/// The shared end-to-end encryption key handed to every room participant.
pub struct EncryptionKey {
    bytes: SecretBox<Vec<u8>>,
}

impl EncryptionKey {
    /// Raw key material.
    pub fn expose(&self) -> &[u8] {
        self.bytes.expose_secret()
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Hands out the process-wide [`EncryptionKey`].
#[derive(Debug, Clone)]
pub struct KeyProvider {
    key: Arc<EncryptionKey>,
}

impl KeyProvider {
    /// Create a provider with a freshly generated random key.
    pub fn generate() -> Result<Self, KeyServiceError> {
        let rng = SystemRandom::new();
        let mut bytes = vec![0u8; KEY_SIZE_BYTES];
        rng.fill(&mut bytes)
            .map_err(|e| KeyServiceError::Crypto(format!("Key generation failed: {:?}", e)))?;

        tracing::info!(target: "key_service", "Generated new shared encryption key");
        Self::from_bytes(bytes)
    }

    /// Create a provider from pre-provisioned key material.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, KeyServiceError> {
        if bytes.len() != KEY_SIZE_BYTES {
            return Err(KeyServiceError::Crypto(format!(
                "Invalid key length: expected {} bytes, got {}",
                KEY_SIZE_BYTES,
                bytes.len()
            )));
        }

        Ok(Self {
            key: Arc::new(EncryptionKey {
                bytes: SecretBox::new(Box::new(bytes)),
            }),
        })
    }

    /// Return the shared key.
    ///
    /// Always succeeds and performs no caller authorization: anyone who can
    /// reach this provider receives the key.
    pub fn fetch(&self) -> Arc<EncryptionKey> {
        Arc::clone(&self.key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_32_bytes() {
        let provider = KeyProvider::generate().unwrap();
        assert_eq!(provider.fetch().expose().len(), KEY_SIZE_BYTES);
    }

    #[test]
    fn test_fetch_returns_same_key() {
        let provider = KeyProvider::generate().unwrap();

        let first = provider.fetch();
        let second = provider.fetch();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.expose(), second.expose());
    }

    #[test]
    fn test_clones_share_key() {
        let provider = KeyProvider::generate().unwrap();
        let clone = provider.clone();

        assert!(Arc::ptr_eq(&provider.fetch(), &clone.fetch()));
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = KeyProvider::generate().unwrap();
        let b = KeyProvider::generate().unwrap();
        assert_ne!(a.fetch().expose(), b.fetch().expose());
    }

    #[test]
    fn test_from_bytes_keeps_material() {
        let provider = KeyProvider::from_bytes(vec![5u8; 32]).unwrap();
        assert_eq!(provider.fetch().expose(), &[5u8; 32]);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        for len in [0, 16, 31, 33, 64] {
            let result = KeyProvider::from_bytes(vec![0u8; len]);
            assert!(
                matches!(result, Err(KeyServiceError::Crypto(ref msg)) if msg.contains("expected 32 bytes")),
                "length {len} should be rejected"
            );
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = KeyProvider::from_bytes(vec![0xAB; 32]).unwrap();
        let debug = format!("{:?}", provider.fetch());

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("171"));
    }
}
