//! Common utilities and types shared across Huddle components.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for session token claims and unverified token inspection
pub mod jwt;
