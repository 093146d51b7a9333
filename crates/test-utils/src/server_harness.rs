//! Test server harness for E2E testing
//!
//! Provides `TestTokenServer` and `TestKeyServer` for spawning real service
//! instances on random local ports.

use crate::crypto_fixtures::{test_jwt_secret, test_shared_key};
use common::secret::SecretBox;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Metrics handle for a test server.
///
/// Installing the global recorder fails after the first server in a test
/// process, so later servers get a standalone recorder instead.
fn test_metrics_handle() -> PrometheusHandle {
    match token_service::routes::init_metrics_recorder() {
        Ok(handle) => handle,
        Err(_) => PrometheusBuilder::new().build_recorder().handle(),
    }
}

/// Bind to a random port and serve `app` in the background.
async fn serve(app: axum::Router) -> Result<(SocketAddr, JoinHandle<()>), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

    let addr = listener
        .local_addr()
        .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("Test server error: {}", e);
        }
    });

    Ok((addr, handle))
}

/// Test harness for spawning the token service in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_issue_e2e() -> Result<(), anyhow::Error> {
///     let server = TestTokenServer::spawn().await?;
///     let response = reqwest::Client::new()
///         .post(format!("{}/token", server.url()))
///         .json(&serde_json::json!({"username": "alice"}))
///         .send()
///         .await?;
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestTokenServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestTokenServer {
    /// Spawn a token server signing with the fixture secret.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_secret(test_jwt_secret()).await
    }

    /// Spawn a token server signing with `secret`.
    pub async fn spawn_with_secret(secret: SecretBox<Vec<u8>>) -> Result<Self, anyhow::Error> {
        let state = Arc::new(token_service::handlers::AppState {
            token_service: token_service::services::TokenService::new(secret),
        });

        let app = token_service::routes::build_routes(state, test_metrics_handle());
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for TestTokenServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

/// Test harness for spawning the key service in E2E tests
pub struct TestKeyServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestKeyServer {
    /// Spawn a key server handing out the fixture shared key.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_key(test_shared_key()).await
    }

    pub async fn spawn_with_key(key: Vec<u8>) -> Result<Self, anyhow::Error> {
        let key_provider = key_service::services::KeyProvider::from_bytes(key)
            .map_err(|e| anyhow::anyhow!("Invalid test key: {}", e))?;
        let state = Arc::new(key_service::handlers::AppState { key_provider });

        let app = key_service::routes::build_routes(state, test_metrics_handle());
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestKeyServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
