use crate::handlers::{self, AppState};
use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Install the global Prometheus recorder and return its render handle.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {}", e))
}

/// Build the application routes: `GET /key`, `/health` and `/metrics`.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let key_routes = Router::new()
        .route("/key", get(handlers::handle_get_key))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    key_routes
        .merge(metrics_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "OK"
}
