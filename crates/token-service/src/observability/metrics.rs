//! Metrics definitions for the token service
//!
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! - `status`: 2 values (success, error)
//! - `error_category`: 5 values (too_large, malformed, signature, expired, none)

use metrics::{counter, histogram};
use std::time::Duration;

/// Record token issuance duration and outcome
///
/// Metrics: `token_issuance_duration_seconds`, `token_issuance_total`
/// Labels: `status`
pub fn record_token_issuance(status: &str, duration: Duration) {
    histogram!("token_issuance_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("token_issuance_total", "status" => status.to_string()).increment(1);
}

/// Record token verification result
///
/// Metric: `token_verifications_total`
/// Labels: `status`, `error_category`
pub fn record_token_verification(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("token_verifications_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}
