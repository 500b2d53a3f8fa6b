//! Configuration module
//!
//! Turns the global CLI flags into the tracker's configuration.

use std::time::Duration;

use testrun_tracker::TrackerConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the test runner gateway
    pub gateway_url: String,

    /// Status polling cadence in milliseconds
    pub poll_interval_ms: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Builds the tracker configuration; `Tracker::from_config` validates it
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::new(self.gateway_url.clone())
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}
