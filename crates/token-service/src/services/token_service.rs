use crate::crypto;
use crate::errors::TokenServiceError;
use crate::observability::hash_for_correlation;
use common::jwt::{SessionClaims, SESSION_TOKEN_TTL_SECONDS};
use common::secret::{ExposeSecret, SecretBox};
use chrono::Utc;
use tracing::instrument;

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Outcome of verifying a token. Verification never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid(SessionClaims),
    Invalid,
}

impl Verification {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid(_))
    }
}

/// Issues and verifies session tokens.
///
/// Stateless apart from the signing secret, which is injected at
/// construction and held for the lifetime of the process. Any non-empty
/// username is accepted: a token proves that a session was granted to that
/// name, not who the caller is.
pub struct TokenService {
    secret: SecretBox<Vec<u8>>,
}

impl TokenService {
    pub fn new(secret: SecretBox<Vec<u8>>) -> Self {
        Self { secret }
    }

    /// Issue a token for `username`, valid for one hour from now.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, TokenServiceError> {
        self.issue_at(username, Utc::now().timestamp())
    }

    /// Issue a token with an explicit issuance time (Unix seconds).
    #[instrument(skip_all, fields(user = %hash_for_correlation(username)))]
    pub fn issue_at(
        &self,
        username: &str,
        issued_at: i64,
    ) -> Result<IssuedToken, TokenServiceError> {
        if username.is_empty() {
            return Err(TokenServiceError::Validation("Username is required".to_string()));
        }

        let claims = SessionClaims::new(username.to_string(), issued_at);
        let token = crypto::sign_token(&claims, self.secret.expose_secret())?;

        tracing::debug!(
            target: "token_service",
            expires_in = SESSION_TOKEN_TTL_SECONDS,
            "Session token issued"
        );

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token against the current wall clock.
    pub fn verify(&self, token: &str) -> Verification {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token against an explicit clock value (Unix seconds).
    ///
    /// Fails closed: malformed input, a signature mismatch or an expiry at or
    /// before `now` all yield [`Verification::Invalid`].
    pub fn verify_at(&self, token: &str, now: i64) -> Verification {
        match crypto::verify_token(token, self.secret.expose_secret(), now) {
            Ok(claims) => Verification::Valid(claims),
            Err(_) => Verification::Invalid,
        }
    }
}
