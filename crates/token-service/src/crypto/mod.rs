//! HS256 signing and verification of session tokens.

use crate::errors::TokenServiceError;
use crate::observability::metrics::record_token_verification;
use common::jwt::{SessionClaims, MAX_JWT_SIZE_BYTES};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::instrument;

/// Sign session claims with the shared HMAC secret.
#[instrument(skip_all)]
pub fn sign_token(claims: &SessionClaims, secret: &[u8]) -> Result<String, TokenServiceError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, &EncodingKey::from_secret(secret))
        .map_err(|e| TokenServiceError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify an HS256 session token against `now` (Unix seconds).
///
/// Validates:
/// - Token size (must be <= MAX_JWT_SIZE_BYTES), checked before parsing
/// - Signature and algorithm (HS256 only)
/// - Expiry: the token is valid only while `now < exp`, with no leeway
///
/// Expiry is checked here rather than by `jsonwebtoken` so the result is a
/// function of the supplied clock alone.
#[instrument(skip_all)]
pub fn verify_token(
    token: &str,
    secret: &[u8],
    now: i64,
) -> Result<SessionClaims, TokenServiceError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        record_token_verification("error", Some("too_large"));
        return Err(TokenServiceError::InvalidToken);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let token_data = decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| {
            tracing::debug!(target: "crypto", error = %e, "Token verification failed");
            record_token_verification("error", Some("signature"));
            TokenServiceError::InvalidToken
        })?;

    if !token_data.claims.is_live_at(now) {
        tracing::debug!(
            target: "crypto",
            exp = token_data.claims.exp,
            now = now,
            "Token rejected: expired"
        );
        record_token_verification("error", Some("expired"));
        return Err(TokenServiceError::InvalidToken);
    }

    record_token_verification("success", None);
    Ok(token_data.claims)
}
