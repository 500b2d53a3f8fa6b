//! Tracker facade
//!
//! Owns the registry, launcher and poller, and exposes the operations a
//! consumer needs. Catalog listing and one-off status checks are passed
//! straight through to the gateway and never touch the registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use testrun_client::GatewayClient;
use testrun_core::domain::project::Project;
use testrun_core::domain::run::{RunId, StatusRecord, TrackedRun};
use testrun_core::dto::run::StatusReport;
use tokio::sync::broadcast;

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::gateway::Gateway;
use crate::launcher::RunLauncher;
use crate::registry::{RegistryEvent, RunRegistry};
use crate::scheduler::StatusPoller;

pub struct Tracker {
    registry: Arc<RunRegistry>,
    gateway: Arc<dyn Gateway>,
    launcher: RunLauncher,
    poller: StatusPoller,
}

impl Tracker {
    pub fn new(gateway: Arc<dyn Gateway>, poll_interval: Duration) -> Self {
        let registry = Arc::new(RunRegistry::new());
        let launcher = RunLauncher::new(Arc::clone(&gateway), Arc::clone(&registry));
        let poller = StatusPoller::new(&registry, Arc::clone(&gateway), poll_interval);

        Self {
            registry,
            gateway,
            launcher,
            poller,
        }
    }

    /// Builds a tracker talking HTTP to the configured gateway
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TrackerError::Config(format!("failed to build HTTP client: {}", e)))?;

        let gateway = GatewayClient::with_client(config.gateway_url.clone(), http_client);
        Ok(Self::new(Arc::new(gateway), config.poll_interval))
    }

    // =============================================================================
    // Runs
    // =============================================================================

    /// Launches a suite and starts tracking the new run
    pub async fn launch_run(&self, project: &str, suite_id: &str) -> Result<RunId> {
        self.launcher.launch(project, suite_id).await
    }

    pub fn snapshot(&self) -> HashMap<RunId, StatusRecord> {
        self.registry.snapshot()
    }

    pub fn runs(&self) -> Vec<TrackedRun> {
        self.registry.runs()
    }

    pub fn get(&self, run_id: &RunId) -> Option<TrackedRun> {
        self.registry.get(run_id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.registry.subscribe()
    }

    /// Stops tracking a run
    pub fn remove(&self, run_id: &RunId) -> Option<TrackedRun> {
        self.registry.remove(run_id)
    }

    /// One-off status check, not merged into the registry
    pub async fn check_status(&self, run_id: &RunId) -> Result<StatusReport> {
        self.gateway
            .check_status(run_id)
            .await
            .map_err(|source| TrackerError::PollTransientFailure {
                run_id: run_id.clone(),
                source,
            })
    }

    // =============================================================================
    // Polling lifecycle
    // =============================================================================

    /// Starts polling; returns `false` if it was already running
    pub fn start(&self) -> bool {
        self.poller.start()
    }

    pub async fn stop(&self) {
        self.poller.stop().await
    }

    pub fn is_running(&self) -> bool {
        self.poller.is_running()
    }

    /// Runs one polling tick and waits for its checks
    pub async fn poll_once(&self) -> usize {
        self.poller.poll_once().await
    }

    pub fn poll_interval(&self) -> Duration {
        self.poller.interval()
    }

    // =============================================================================
    // Catalog
    // =============================================================================

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.gateway
            .list_projects()
            .await
            .map_err(TrackerError::CatalogUnavailable)
    }

    pub async fn list_test_suites(&self, project: &str) -> Result<Vec<String>> {
        if project.trim().is_empty() {
            return Err(TrackerError::InvalidRequest(
                "project name cannot be empty".to_string(),
            ));
        }

        self.gateway
            .list_test_suites(project)
            .await
            .map_err(TrackerError::CatalogUnavailable)
    }

    pub fn registry(&self) -> &Arc<RunRegistry> {
        &self.registry
    }
}
