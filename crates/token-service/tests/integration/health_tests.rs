//! Integration tests for the health and metrics endpoints.

use reqwest::StatusCode;
use test_utils::TestTokenServer;

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestTokenServer::spawn().await?;

    // Act
    let response = reqwest::Client::new()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Health check should return 200 OK"
    );
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_is_exposed() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
