//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests
//! against them, and asserting on responses.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use track_api::{create_app, create_app_state};
use track_common::{
    AppConfig, AppSettings, AuthConfig, CorsConfig, DatabaseConfig, Environment, GeoIpConfig,
    NotifyConfig, ServerConfig, TrackingConfig,
};
use track_core::value_objects::ProxyRanges;

/// API key every test server is configured with
pub const TEST_API_KEY: &str = "integration-test-key";

/// Counter for unique test ports
static PORT_COUNTER: AtomicU16 = AtomicU16::new(19000);

/// Get a unique port for testing
pub fn get_test_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with the default test configuration
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server whose suppression window is zero, so opens
    /// recorded right after registration still count as genuine
    pub async fn start_without_suppression() -> Result<Self> {
        let mut config = test_config()?;
        config.tracking.suppression_window_secs = 0;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let port = get_test_port();
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        // Create app state
        let state = create_app_state(config).await?;

        // Build application
        let app = create_app(state);

        // Bind to port
        let listener = TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        // Spawn server task; ConnectInfo is needed by the client-ip extractor
        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Create HTTP client
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with the API key header
    pub async fn get_auth(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header("x-api-key", TEST_API_KEY)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body, without credentials
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with the API key header
    pub async fn post_auth<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("x-api-key", TEST_API_KEY)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PATCH request with the API key header
    pub async fn patch_auth<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .patch(&url)
            .header("x-api-key", TEST_API_KEY)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with the API key header
    pub async fn delete_auth(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .delete(&url)
            .header("x-api-key", TEST_API_KEY)
            .send()
            .await?)
    }

    /// Fetch a tracking pixel the way a mail client would
    pub async fn fetch_pixel(&self, id: &str) -> Result<Response> {
        let url = format!("{}/p/{}.gif", self.base_url(), id);
        Ok(self
            .client
            .get(&url)
            .header("user-agent", "Mozilla/5.0 (integration test)")
            .send()
            .await?)
    }

    /// Fetch a tracking pixel with a spoofed source address
    ///
    /// The server trusts `X-Real-IP` the way it would behind a reverse
    /// proxy, which lets tests exercise the proxy-range classification.
    pub async fn fetch_pixel_from(&self, id: &str, ip: &str) -> Result<Response> {
        let url = format!("{}/p/{}.gif", self.base_url(), id);
        Ok(self
            .client
            .get(&url)
            .header("user-agent", "Mozilla/5.0 (integration test)")
            .header("x-real-ip", ip)
            .send()
            .await?)
    }
}

/// Create a test configuration
///
/// The database URL comes from `TEST_DATABASE_URL` (falling back to
/// `DATABASE_URL`); everything else is fixed so tests never depend on a
/// developer's local `.env` values.
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("TEST_DATABASE_URL or DATABASE_URL must be set"))?;

    Ok(AppConfig {
        app: AppSettings {
            name: "mailtrack-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
            min_connections: 1,
        },
        auth: AuthConfig {
            api_key: TEST_API_KEY.to_string(),
        },
        tracking: TrackingConfig {
            base_url: "http://tracker.test".to_string(),
            suppression_window_secs: 5,
            proxy_ranges: ProxyRanges::default(),
        },
        geoip: GeoIpConfig { db_path: None },
        cors: CorsConfig::default(),
        smtp: None,
        notify: NotifyConfig {
            follow_up_after_days: 3,
            scan_interval_secs: 900,
        },
    })
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("TEST_DATABASE_URL").is_err() && std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: TEST_DATABASE_URL/DATABASE_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
