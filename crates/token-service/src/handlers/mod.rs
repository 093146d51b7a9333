//! HTTP request handlers for the token service.

pub mod metrics;
pub mod token_handler;

pub use metrics::metrics_handler;
pub use token_handler::{handle_issue_token, handle_verify_token, AppState};
