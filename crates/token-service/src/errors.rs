use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Token service error type.
///
/// Response bodies are flat `{"error": "..."}` objects. Internal details are
/// logged server-side and never returned to the caller.
#[derive(Debug, Error)]
pub enum TokenServiceError {
    /// Malformed caller input (missing username or token).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Token failed verification (signature, format or expiry).
    #[error("Invalid token")]
    InvalidToken,

    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    valid: Option<bool>,
    error: String,
}

impl IntoResponse for TokenServiceError {
    fn into_response(self) -> Response {
        let (status, valid, message) = match &self {
            TokenServiceError::Validation(message) => {
                (StatusCode::BAD_REQUEST, None, message.clone())
            }
            TokenServiceError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                Some(false),
                "Invalid token".to_string(),
            ),
            TokenServiceError::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                "An internal error occurred".to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                valid,
                error: message,
            }),
        )
            .into_response()
    }
}
