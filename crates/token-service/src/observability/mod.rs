//! Observability for the token service.
//!
//! Instrumentation uses `#[instrument(skip_all)]` with explicit fields.
//! Usernames are only ever logged through [`hash_for_correlation`]; tokens
//! and the signing secret never appear in logs.

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Not a security boundary: the truncated digest lets log lines for the
/// same user be grouped without recording the name itself.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    hex::encode(result.get(..4).unwrap_or_default())
}
