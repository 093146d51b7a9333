use crate::observability::metrics::record_key_fetch;
use crate::services::KeyProvider;
use axum::{
    extract::State,
    http::header::{HeaderMap, HeaderValue, CACHE_CONTROL},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Application state shared across handlers
pub struct AppState {
    pub key_provider: KeyProvider,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeyResponse {
    /// Standard base64 of the raw key bytes.
    pub key: String,
}

/// Handle shared key request
///
/// GET /key
///
/// Returns the shared encryption key to any caller. The response must not
/// be stored by intermediaries, hence `Cache-Control: no-store`.
#[instrument(name = "key.fetch", skip_all)]
pub async fn handle_get_key(State(state): State<Arc<AppState>>) -> (HeaderMap, Json<KeyResponse>) {
    let key = state.key_provider.fetch();
    record_key_fetch();

    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    (
        headers,
        Json(KeyResponse {
            key: general_purpose::STANDARD.encode(key.expose()),
        }),
    )
}
