//! Mock credential provider for orchestrator testing.
//!
//! Issues real HS256 tokens signed with the test secret (so the
//! orchestrator can read their expiry) and hands out the fixture shared
//! key, unless configured to fail.

use crate::crypto_fixtures::test_shared_key;
use crate::token_builders::TestTokenBuilder;
use async_trait::async_trait;
use common::secret::{SecretBox, SecretString};
use room_client::credentials::CredentialProvider;
use room_client::errors::CredentialError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock implementation of [`CredentialProvider`].
pub struct MockCredentialProvider {
    token_error: Option<CredentialError>,
    key_error: Option<CredentialError>,
    key: Vec<u8>,
    usernames: Mutex<Vec<String>>,
    token_calls: AtomicUsize,
    key_calls: AtomicUsize,
}

impl MockCredentialProvider {
    /// Provider that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_error: None,
            key_error: None,
            key: test_shared_key(),
            usernames: Mutex::new(Vec::new()),
            token_calls: AtomicUsize::new(0),
            key_calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing_token(mut self, error: CredentialError) -> Self {
        self.token_error = Some(error);
        self
    }

    #[must_use]
    pub fn failing_key(mut self, error: CredentialError) -> Self {
        self.key_error = Some(error);
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: Vec<u8>) -> Self {
        self.key = key;
        self
    }

    /// Usernames tokens were requested for, in call order.
    pub fn usernames(&self) -> Vec<String> {
        self.usernames.lock().unwrap().clone()
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn key_calls(&self) -> usize {
        self.key_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for MockCredentialProvider {
    async fn issue_token(&self, username: &str) -> Result<SecretString, CredentialError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.usernames.lock().unwrap().push(username.to_string());

        if let Some(error) = &self.token_error {
            return Err(error.clone());
        }
        if username.is_empty() {
            return Err(CredentialError::Rejected("Username is required".to_string()));
        }

        Ok(SecretString::from(
            TestTokenBuilder::new().for_user(username).sign(),
        ))
    }

    async fn fetch_key(&self) -> Result<SecretBox<Vec<u8>>, CredentialError> {
        self.key_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.key_error {
            return Err(error.clone());
        }
        Ok(SecretBox::new(Box::new(self.key.clone())))
    }
}
