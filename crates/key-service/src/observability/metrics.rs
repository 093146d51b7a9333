//! Metrics definitions for the key service

use metrics::counter;

/// Record a shared key fetch
///
/// Metric: `key_fetch_total`
pub fn record_key_fetch() {
    counter!("key_fetch_total").increment(1);
}
