//! Tracker configuration
//!
//! Defines the tunable parameters of the engine: where the gateway lives,
//! how often runs are polled and how long a single request may take.

use std::time::Duration;

use testrun_client::DEFAULT_GATEWAY_URL;

use crate::error::{Result, TrackerError};

/// Reference polling cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Upper bound for a single gateway request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracker configuration
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Gateway base URL (e.g., "http://localhost/service-test-runner")
    pub gateway_url: String,

    /// How often non-terminal runs are polled
    pub poll_interval: Duration,

    /// Timeout applied to every gateway request
    pub request_timeout: Duration,
}

impl TrackerConfig {
    /// Creates a new configuration with default intervals
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.gateway_url.is_empty() {
            return Err(TrackerError::Config("gateway_url cannot be empty".to_string()));
        }

        if !self.gateway_url.starts_with("http://") && !self.gateway_url.starts_with("https://") {
            return Err(TrackerError::Config(
                "gateway_url must start with http:// or https://".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(TrackerError::Config(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(TrackerError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL)
    }
}
