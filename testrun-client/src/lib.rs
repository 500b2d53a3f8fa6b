//! Testrun HTTP Client
//!
//! A small, type-safe HTTP client for the test runner gateway.
//!
//! The gateway exposes four operations: listing projects, listing the test
//! suites of a project, launching a run and checking a run's status. Every
//! response wraps its payload in a `{ "data": ... }` envelope, which this
//! client unwraps.
//!
//! # Example
//!
//! ```no_run
//! use testrun_client::GatewayClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::new("http://localhost/service-test-runner");
//!
//!     let launched = client.launch_run("P1", "smoke").await?;
//!     let report = client.check_status(&launched.running_id).await?;
//!
//!     println!("{} is at checkpoint {}", report.id_test, report.checkpoint);
//!     Ok(())
//! }
//! ```

pub mod error;
mod catalog;
mod runs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;
use testrun_core::dto::Envelope;

/// Default gateway location used when nothing else is configured
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost/service-test-runner";

/// HTTP client for the test runner gateway
#[derive(Debug, Clone)]
pub struct GatewayClient {
    /// Base URL of the gateway (e.g., "http://localhost/service-test-runner")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl GatewayClient {
    /// Create a new gateway client
    ///
    /// # Example
    /// ```
    /// use testrun_client::GatewayClient;
    ///
    /// let client = GatewayClient::new("http://localhost/service-test-runner");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new gateway client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use testrun_client::GatewayClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GatewayClient::with_client("http://localhost/service-test-runner", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the gateway
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and unwrap the `data` envelope
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json::<Envelope<T>>()
            .await
            .map(Envelope::into_inner)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
