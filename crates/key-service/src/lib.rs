//! Key Service Library
//!
//! Provisions the single shared key that room participants use for
//! end-to-end media encryption.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `observability` - Metrics
//! - `routes` - Router assembly
//! - `services` - Key provider

pub mod config;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod services;
