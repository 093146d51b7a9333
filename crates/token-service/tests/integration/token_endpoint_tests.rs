//! Integration tests for `POST /token` and `POST /verify`.

use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::{TestTokenBuilder, TestTokenServer, TokenAssertions, TEST_USER_ALICE};

async fn issue(server: &TestTokenServer, body: Value) -> Result<reqwest::Response, anyhow::Error> {
    Ok(reqwest::Client::new()
        .post(format!("{}/token", server.url()))
        .json(&body)
        .send()
        .await?)
}

async fn verify(server: &TestTokenServer, body: Value) -> Result<reqwest::Response, anyhow::Error> {
    Ok(reqwest::Client::new()
        .post(format!("{}/verify", server.url()))
        .json(&body)
        .send()
        .await?)
}

// ============================================================================
// Issuance
// ============================================================================

#[tokio::test]
async fn test_issue_token_for_username() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = issue(&server, json!({"username": TEST_USER_ALICE})).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("token missing from response"))?
        .to_string();

    token
        .assert_valid_jwt()
        .assert_for_user(TEST_USER_ALICE)
        .assert_expires_in(3600);

    Ok(())
}

#[tokio::test]
async fn test_issue_token_requires_username() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    for body in [json!({}), json!({"username": ""}), json!({"username": null})] {
        let response = issue(&server, body).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = response.json().await?;
        assert_eq!(body, json!({"error": "Username is required"}));
    }

    Ok(())
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn test_issue_then_verify_round_trip() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let body: Value = issue(&server, json!({"username": TEST_USER_ALICE}))
        .await?
        .json()
        .await?;

    let response = verify(&server, json!({"token": body["token"]})).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert_eq!(body["valid"], true);
    assert_eq!(body["decoded"]["username"], TEST_USER_ALICE);
    assert_eq!(
        body["decoded"]["exp"].as_i64().unwrap_or_default()
            - body["decoded"]["iat"].as_i64().unwrap_or_default(),
        3600
    );

    Ok(())
}

#[tokio::test]
async fn test_verify_garbage_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = verify(&server, json!({"token": "garbage"})).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await?;
    assert_eq!(body, json!({"valid": false, "error": "Invalid token"}));

    Ok(())
}

#[tokio::test]
async fn test_verify_expired_token_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(TEST_USER_ALICE)
        .expired_seconds_ago(1)
        .sign();

    let response = verify(&server, json!({"token": token})).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_verify_token_signed_with_other_secret() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(TEST_USER_ALICE)
        .sign_with(b"a-completely-different-secret-32b");

    let response = verify(&server, json!({"token": token})).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_issue_token_plain_text_body_gets_json_error() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/token", server.url()))
        .body(r#"{"username":"alice"}"#)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await?;
    assert_eq!(body, json!({"error": "Username is required"}));

    Ok(())
}

#[tokio::test]
async fn test_verify_requires_token() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    for body in [json!({}), json!({"token": ""})] {
        let response = verify(&server, body).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = response.json().await?;
        assert_eq!(body, json!({"error": "Token is required"}));
    }

    Ok(())
}

#[tokio::test]
async fn test_verify_oversized_token_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let token = "a".repeat(10_000);

    let response = verify(&server, json!({"token": token})).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
