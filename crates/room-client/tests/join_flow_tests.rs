//! End-to-end join against real token and key services.
//!
//! Spawns both services on random ports and joins through
//! `HttpCredentialProvider`, with the media connection mocked.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

use common::jwt::SESSION_TOKEN_TTL_SECONDS;
use room_client::config::ClientConfig;
use room_client::credentials::{CredentialProvider, HttpCredentialProvider};
use room_client::errors::{ClientError, CredentialError};
use room_client::transport::KeyMode;
use room_client::{SessionOrchestrator, SessionState};
use std::collections::HashMap;
use std::sync::Arc;
use test_utils::{
    test_shared_key, MockRoomTransport, TestKeyServer, TestTokenServer, TokenAssertions,
    TEST_ROOM_LOBBY, TEST_ROOM_URL, TEST_USER_ALICE,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn client_config(token_url: &str, key_url: &str) -> ClientConfig {
    let vars = HashMap::from([
        ("TOKEN_SERVICE_URL".to_string(), format!("{token_url}/")),
        ("KEY_SERVICE_URL".to_string(), key_url.to_string()),
        ("ROOM_URL".to_string(), TEST_ROOM_URL.to_string()),
    ]);
    ClientConfig::from_vars(&vars).expect("valid config")
}

#[tokio::test]
async fn test_join_with_http_credentials() -> Result<(), anyhow::Error> {
    let token_server = TestTokenServer::spawn().await?;
    let key_server = TestKeyServer::spawn().await?;
    let config = client_config(&token_server.url(), &key_server.url());

    let transport = Arc::new(MockRoomTransport::builder().build());
    let credentials = Arc::new(HttpCredentialProvider::new(&config)?);
    let (tx, _updates) = mpsc::unbounded_channel();
    let (handle, _task) = SessionOrchestrator::spawn(
        transport.clone(),
        credentials,
        config.room_url.clone(),
        tx,
        CancellationToken::new(),
    );

    let info = handle.join(TEST_USER_ALICE, TEST_ROOM_LOBBY).await?;

    let connects = transport.connects();
    assert_eq!(connects.len(), 1);
    let token = connects[0].token.clone();
    token.assert_valid_jwt();
    token.assert_for_user(TEST_USER_ALICE);
    token.assert_expires_in(SESSION_TOKEN_TTL_SECONDS);
    assert_eq!(connects[0].shared_key, test_shared_key());
    assert_eq!(connects[0].key_mode, KeyMode::SharedKey);
    assert_eq!(handle.state().await?, SessionState::Connected(info));

    handle.leave().await?;
    assert_eq!(transport.disconnect_calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_join_empty_username_rejected_by_token_service() -> Result<(), anyhow::Error> {
    let token_server = TestTokenServer::spawn().await?;
    let key_server = TestKeyServer::spawn().await?;
    let config = client_config(&token_server.url(), &key_server.url());

    let transport = Arc::new(MockRoomTransport::builder().build());
    let (tx, _updates) = mpsc::unbounded_channel();
    let (handle, _task) = SessionOrchestrator::spawn(
        transport.clone(),
        Arc::new(HttpCredentialProvider::new(&config)?),
        config.room_url.clone(),
        tx,
        CancellationToken::new(),
    );

    let result = handle.join("", TEST_ROOM_LOBBY).await;
    match result {
        Err(ClientError::AuthFailed(message)) => {
            assert!(message.contains("Username is required"), "got: {message}");
        }
        other => panic!("expected AuthFailed, got {other:?}"),
    }
    assert_eq!(transport.connect_calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_unreachable_key_service_is_http_error() -> Result<(), anyhow::Error> {
    let token_server = TestTokenServer::spawn().await?;
    // Nothing listens on port 9 of localhost
    let config = client_config(&token_server.url(), "http://127.0.0.1:9");
    let provider = HttpCredentialProvider::new(&config)?;

    let result = provider.fetch_key().await;
    assert!(matches!(result, Err(CredentialError::Http(_))));

    Ok(())
}

#[tokio::test]
async fn test_fetch_key_decodes_served_key() -> Result<(), anyhow::Error> {
    let token_server = TestTokenServer::spawn().await?;
    let key_server = TestKeyServer::spawn_with_key(vec![0x11; 32]).await?;
    let config = client_config(&token_server.url(), &key_server.url());
    let provider = HttpCredentialProvider::new(&config)?;

    let key = provider.fetch_key().await?;
    assert_eq!(
        common::secret::ExposeSecret::expose_secret(&key).as_slice(),
        &[0x11; 32]
    );

    Ok(())
}
