//! Run endpoints (launch and status check)

use crate::GatewayClient;
use crate::error::{ClientError, Result};
use testrun_core::dto::run::{CheckStatusRequest, LaunchRequest, LaunchResponse, StatusReport};

impl GatewayClient {
    /// Launch a test suite of a project
    ///
    /// `POST /automation/run`
    ///
    /// # Returns
    /// The gateway-assigned `running_id` together with the suite it runs
    pub async fn launch_run(&self, project: &str, testsuite_id: &str) -> Result<LaunchResponse> {
        let response = self
            .client
            .post(self.url("/automation/run"))
            .json(&LaunchRequest {
                testsuite_id: testsuite_id.to_string(),
                project: project.to_string(),
            })
            .send()
            .await?;

        let launched: LaunchResponse = self.handle_response(response).await?;

        if launched.running_id.trim().is_empty() {
            return Err(ClientError::ParseError(
                "Launch response carried an empty running_id".to_string(),
            ));
        }

        tracing::debug!(
            running_id = %launched.running_id,
            testsuite_id = %launched.testsuite_id,
            "Gateway accepted run"
        );

        Ok(launched)
    }

    /// Check the status of a run
    ///
    /// `POST /automation/check-status`
    pub async fn check_status(&self, id_test: &str) -> Result<StatusReport> {
        let response = self
            .client
            .post(self.url("/automation/check-status"))
            .json(&CheckStatusRequest {
                id_test: id_test.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }
}
