//! HTTP routes for the token service.

use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Install the global Prometheus recorder and return its render handle.
///
/// Fails if a recorder is already installed in this process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {}", e))
}

/// Build the application routes.
///
/// - `POST /token` - issue a session token
/// - `POST /verify` - verify a session token
/// - `/health` - liveness check
/// - `/metrics` - Prometheus metrics
///
/// CORS is permissive: browser clients on other origins call these
/// endpoints directly.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let token_routes = Router::new()
        .route("/token", post(handlers::handle_issue_token))
        .route("/verify", post(handlers::handle_verify_token))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    token_routes
        .merge(metrics_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "OK"
}
