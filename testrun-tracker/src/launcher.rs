//! Run launcher
//!
//! Asks the gateway to start a run and seeds the registry with a Queued
//! record for it. Nothing is registered unless the gateway accepted the run.

use std::sync::Arc;

use chrono::Utc;
use testrun_client::ClientError;
use testrun_core::domain::run::{Run, RunId};
use tracing::{info, warn};

use crate::error::{Result, TrackerError};
use crate::gateway::Gateway;
use crate::registry::RunRegistry;

pub struct RunLauncher {
    gateway: Arc<dyn Gateway>,
    registry: Arc<RunRegistry>,
}

impl RunLauncher {
    pub fn new(gateway: Arc<dyn Gateway>, registry: Arc<RunRegistry>) -> Self {
        Self { gateway, registry }
    }

    /// Launches `suite_id` of `project_name` and starts tracking it
    ///
    /// Launching the same pair twice yields two independent runs.
    pub async fn launch(&self, project_name: &str, suite_id: &str) -> Result<RunId> {
        let project_name = project_name.trim();
        let suite_id = suite_id.trim();

        if project_name.is_empty() {
            return Err(TrackerError::InvalidRequest(
                "project name cannot be empty".to_string(),
            ));
        }
        if suite_id.is_empty() {
            return Err(TrackerError::InvalidRequest(
                "test suite id cannot be empty".to_string(),
            ));
        }

        let launch_failed = |source: ClientError| TrackerError::LaunchFailed {
            project: project_name.to_string(),
            suite_id: suite_id.to_string(),
            source,
        };

        let launched = self
            .gateway
            .launch_run(project_name, suite_id)
            .await
            .map_err(launch_failed)?;

        if launched.running_id.trim().is_empty() {
            return Err(launch_failed(ClientError::ParseError(
                "gateway returned an empty running_id".to_string(),
            )));
        }

        let run_id = RunId::new(launched.running_id);
        let run = Run {
            run_id: run_id.clone(),
            suite_id: suite_id.to_string(),
            project_name: project_name.to_string(),
            launched_at: Utc::now(),
        };

        if !self.registry.insert(run) {
            warn!(run_id = %run_id, "Gateway reused a run id that is already tracked");
            return Err(launch_failed(ClientError::ParseError(format!(
                "gateway returned already tracked run id {}",
                run_id
            ))));
        }

        info!(
            run_id = %run_id,
            project = project_name,
            suite = suite_id,
            "Launched test run"
        );

        Ok(run_id)
    }
}
