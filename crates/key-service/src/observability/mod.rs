//! Observability for the key service.
//!
//! Key material never appears in logs or metric labels.

pub mod metrics;
