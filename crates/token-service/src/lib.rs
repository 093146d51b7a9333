//! Token Service Library
//!
//! Issues and verifies the short-lived HS256 session tokens that admit a
//! participant to a room.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - JWT signing and verification
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `observability` - Metrics and log correlation helpers
//! - `routes` - Router assembly
//! - `services` - Business logic layer

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod services;
