//! Deterministic cryptographic fixtures for testing
//!
//! The same bytes every run, so tokens and keys are reproducible across
//! tests and processes.

use common::secret::{SecretBox, SHARED_KEY_SIZE_BYTES};

/// Token signing secret used by the test token server (32 bytes).
pub const TEST_JWT_SECRET: &[u8; 32] = b"huddle-test-secret-do-not-deploy";

/// Shared key bytes handed out by the test key server.
pub fn test_shared_key() -> Vec<u8> {
    (0..SHARED_KEY_SIZE_BYTES)
        .map(|i| (i as u8).wrapping_mul(7).wrapping_add(3))
        .collect()
}

/// The test signing secret wrapped for injection into a `TokenService`.
pub fn test_jwt_secret() -> SecretBox<Vec<u8>> {
    SecretBox::new(Box::new(TEST_JWT_SECRET.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    #[test]
    fn test_fixtures_are_deterministic() {
        assert_eq!(test_shared_key(), test_shared_key());
        assert_eq!(test_shared_key().len(), 32);
        assert_eq!(test_jwt_secret().expose_secret().len(), 32);
    }
}
