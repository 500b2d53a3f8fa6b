//! Catalog endpoints (projects and test suites)

use crate::GatewayClient;
use crate::error::Result;
use testrun_core::domain::project::Project;
use testrun_core::dto::catalog::TestSuiteList;

impl GatewayClient {
    /// List all projects
    ///
    /// `GET /projects`
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let response = self.client.get(self.url("/projects")).send().await?;

        self.handle_response(response).await
    }

    /// List the test suites of a project
    ///
    /// `GET /testsuites?project=<name>`
    pub async fn list_test_suites(&self, project: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.url("/testsuites"))
            .query(&[("project", project)])
            .send()
            .await?;

        let list: TestSuiteList = self.handle_response(response).await?;
        Ok(list.testsuites)
    }
}
