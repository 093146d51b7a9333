use crate::errors::TokenServiceError;
use crate::observability::metrics::{record_token_issuance, record_token_verification};
use crate::services::{TokenService, Verification};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use common::jwt::SessionClaims;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// Application state shared across handlers
pub struct AppState {
    pub token_service: TokenService,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub decoded: SessionClaims,
}

/// Request body as loose JSON. A missing body, wrong content type or
/// mistyped field is answered by the handler, not the extractor.
type JsonBody = Result<Json<Value>, JsonRejection>;

/// Non-null field `name` of the body, if the body parsed at all.
fn body_field<'a>(payload: &'a JsonBody, name: &str) -> Option<&'a Value> {
    match payload {
        Ok(Json(body)) => body.get(name).filter(|value| !value.is_null()),
        Err(rejection) => {
            debug!(target: "token_service", error = %rejection, "Unreadable request body");
            None
        }
    }
}

/// Handle token issuance
///
/// POST /token
///
/// No credential check is performed: any non-empty username receives a
/// token bound to that name.
#[instrument(name = "token.issue", skip_all, fields(status))]
pub async fn handle_issue_token(
    State(state): State<Arc<AppState>>,
    payload: JsonBody,
) -> Result<Json<TokenResponse>, TokenServiceError> {
    let start = Instant::now();

    let result = match body_field(&payload, "username").and_then(Value::as_str) {
        Some(username) => state.token_service.issue(username),
        None => Err(TokenServiceError::Validation("Username is required".to_string())),
    };

    let status = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("status", status);
    record_token_issuance(status, start.elapsed());

    let issued = result?;
    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

/// Handle token verification
///
/// POST /verify
///
/// Returns 200 with the decoded claims, 401 for any token that does not
/// verify (including a token that is not a string), and 400 only when no
/// token was supplied at all.
#[instrument(name = "token.verify", skip_all, fields(valid))]
pub async fn handle_verify_token(
    State(state): State<Arc<AppState>>,
    payload: JsonBody,
) -> Result<Json<VerifyResponse>, TokenServiceError> {
    let verification = match body_field(&payload, "token") {
        None => return Err(TokenServiceError::Validation("Token is required".to_string())),
        Some(Value::String(token)) if token.is_empty() => {
            return Err(TokenServiceError::Validation("Token is required".to_string()))
        }
        Some(Value::String(token)) => state.token_service.verify(token),
        Some(_) => {
            record_token_verification("error", Some("malformed"));
            Verification::Invalid
        }
    };

    match verification {
        Verification::Valid(claims) => {
            tracing::Span::current().record("valid", true);
            Ok(Json(VerifyResponse {
                valid: true,
                decoded: claims,
            }))
        }
        Verification::Invalid => {
            tracing::Span::current().record("valid", false);
            Err(TokenServiceError::InvalidToken)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &str) -> JsonBody {
        let mut builder = Request::builder().method("POST").uri("/token");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        <JsonBody as FromRequest<()>>::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_body_field_reads_present_field() {
        let payload = extract(Some("application/json"), r#"{"username":"alice"}"#).await;
        assert_eq!(body_field(&payload, "username"), Some(&json!("alice")));
    }

    #[tokio::test]
    async fn test_body_field_treats_null_as_absent() {
        let payload = extract(Some("application/json"), r#"{"username":null}"#).await;
        assert_eq!(body_field(&payload, "username"), None);
    }

    #[tokio::test]
    async fn test_body_field_absent_for_unreadable_body() {
        let not_json = extract(Some("application/json"), "not json").await;
        assert!(not_json.is_err());
        assert_eq!(body_field(&not_json, "username"), None);

        let no_content_type = extract(None, r#"{"username":"alice"}"#).await;
        assert!(no_content_type.is_err());
        assert_eq!(body_field(&no_content_type, "username"), None);
    }

    #[test]
    fn test_verify_response_shape() {
        let response = VerifyResponse {
            valid: true,
            decoded: SessionClaims::new("alice".to_string(), 100),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["decoded"]["username"], "alice");
        assert_eq!(json["decoded"]["iat"], 100);
        assert_eq!(json["decoded"]["exp"], 3700);
    }
}
