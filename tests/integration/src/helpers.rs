//! Test helpers for integration tests
//!
//! Provides a test server bound to an ephemeral port and response assertions.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use presence_common::AppConfig;
use presence_relay::{create_app, serve, AppState};
use presence_service::{shutdown_channel, ServiceContext, ShutdownTrigger};
use presence_store::MemoryStore;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Guild every test config points at
pub const TEST_GUILD_ID: i64 = 175_928_847_299_117_063;

/// Channel excluded from voice time
pub const AFK_CHANNEL_ID: i64 = 99;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryStore>,
    trigger: ShutdownTrigger,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server over an empty in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let (trigger, shutdown) = shutdown_channel();
        let ctx = ServiceContext::new(store.clone()).with_shutdown(shutdown.clone());
        let app = create_app(AppState::new(ctx, config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, app, shutdown).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store,
            trigger,
            handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Path under the test guild, e.g. `guild_path("/oncall")`
    pub fn guild_path(&self, suffix: &str) -> String {
        format!("/api/v1/guilds/{TEST_GUILD_ID}{suffix}")
    }

    /// Trigger graceful shutdown and wait for the server task
    pub async fn stop(mut self) -> Result<()> {
        self.trigger.trigger();
        if let Some(handle) = self.handle.take() {
            handle.await?;
        }
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.trigger.trigger();
    }
}

/// Environment a relay would be started with, minus the real store
pub fn test_vars() -> HashMap<&'static str, String> {
    HashMap::from([
        ("API_HOST", "127.0.0.1".to_string()),
        ("API_PORT", "0".to_string()),
        ("INFLUX_URL", "localhost:8086".to_string()),
        ("INFLUX_TOKEN", "test-token".to_string()),
        ("INFLUX_ORG", "test".to_string()),
        ("INFLUX_BUCKET", "presence_test".to_string()),
        ("DISCORD_GUILD_ID", TEST_GUILD_ID.to_string()),
        ("DISCORD_IGNORED_CHANNEL_ID", AFK_CHANNEL_ID.to_string()),
    ])
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    let vars = test_vars();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
