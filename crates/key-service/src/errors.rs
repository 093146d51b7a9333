use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyServiceError {
    /// Random key generation or key material rejected.
    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for KeyServiceError {
    fn into_response(self) -> Response {
        tracing::error!(target: "key_service", error = %self, "Request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "An internal error occurred".to_string(),
            }),
        )
            .into_response()
    }
}
