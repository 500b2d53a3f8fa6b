//! Gateway port
//!
//! The engine talks to the test runner backend only through this trait, so
//! the launcher and scheduler can be exercised against an in-memory fake.

use async_trait::async_trait;
use testrun_client::{GatewayClient, Result};
use testrun_core::domain::project::Project;
use testrun_core::domain::run::RunId;
use testrun_core::dto::run::{LaunchResponse, StatusReport};

/// Operations the engine needs from the test runner backend
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Lists the projects that can be tested
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Lists the test suites of a project
    async fn list_test_suites(&self, project: &str) -> Result<Vec<String>>;

    /// Starts a run of `suite_id` in `project`
    async fn launch_run(&self, project: &str, suite_id: &str) -> Result<LaunchResponse>;

    /// Fetches the current status of a run
    async fn check_status(&self, run_id: &RunId) -> Result<StatusReport>;
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        GatewayClient::list_projects(self).await
    }

    async fn list_test_suites(&self, project: &str) -> Result<Vec<String>> {
        GatewayClient::list_test_suites(self, project).await
    }

    async fn launch_run(&self, project: &str, suite_id: &str) -> Result<LaunchResponse> {
        GatewayClient::launch_run(self, project, suite_id).await
    }

    async fn check_status(&self, run_id: &RunId) -> Result<StatusReport> {
        GatewayClient::check_status(self, run_id.as_str()).await
    }
}
