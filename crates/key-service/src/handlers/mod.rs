pub mod key_handler;
pub mod metrics;

pub use key_handler::{handle_get_key, AppState};
pub use metrics::metrics_handler;
