//! Integration tests for `GET /key`.

use base64::{engine::general_purpose, Engine as _};
use reqwest::{header::CACHE_CONTROL, StatusCode};
use serde_json::Value;
use test_utils::{test_shared_key, TestKeyServer};

async fn fetch_key(server: &TestKeyServer) -> Result<Vec<u8>, anyhow::Error> {
    let response = reqwest::get(format!("{}/key", server.url())).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    let encoded = body["key"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("key missing from response"))?;
    Ok(general_purpose::STANDARD.decode(encoded)?)
}

#[tokio::test]
async fn test_get_key_returns_shared_key() -> Result<(), anyhow::Error> {
    let server = TestKeyServer::spawn().await?;

    assert_eq!(fetch_key(&server).await?, test_shared_key());
    Ok(())
}

#[tokio::test]
async fn test_get_key_twice_is_byte_identical() -> Result<(), anyhow::Error> {
    let server = TestKeyServer::spawn().await?;

    let first = fetch_key(&server).await?;
    let second = fetch_key(&server).await?;

    assert_eq!(first.len(), 32);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_get_key_is_not_cacheable() -> Result<(), anyhow::Error> {
    let server = TestKeyServer::spawn().await?;

    let response = reqwest::get(format!("{}/key", server.url())).await?;
    assert_eq!(
        response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    Ok(())
}

#[tokio::test]
async fn test_get_key_requires_no_credentials() -> Result<(), anyhow::Error> {
    let server = TestKeyServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/key", server.url()))
        .header("Authorization", "Bearer not-a-token")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
