//! Scripted in-memory gateway used by the engine's tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use testrun_client::{ClientError, Result};
use testrun_core::domain::project::Project;
use testrun_core::domain::run::{RunId, StatusCode};
use testrun_core::dto::run::{LaunchResponse, StatusReport};

use crate::gateway::Gateway;

/// One scripted reply to a status check
#[derive(Debug, Clone)]
pub enum Reply {
    Report {
        report: StatusReport,
        delay: Option<Duration>,
    },
    Fail,
}

impl Reply {
    pub fn status(id: &str, status: i64, checkpoint: u64) -> Self {
        Reply::Report {
            report: report(id, status, checkpoint),
            delay: None,
        }
    }

    pub fn delayed(self, by: Duration) -> Self {
        match self {
            Reply::Report { report, .. } => Reply::Report {
                report,
                delay: Some(by),
            },
            Reply::Fail => Reply::Fail,
        }
    }
}

pub fn report(id: &str, status: i64, checkpoint: u64) -> StatusReport {
    StatusReport {
        id_test: id.to_string(),
        status: StatusCode::from(status),
        checkpoint,
        progress: None,
        step_name: None,
        total_steps: None,
        report_file: None,
    }
}

/// Gateway double
///
/// Launches hand out `r-1`, `r-2`, ... unless ids were queued with
/// `next_launch_id`. Status checks replay the replies scripted per run; the
/// last reply repeats once the script is exhausted.
#[derive(Default)]
pub struct FakeGateway {
    launch_counter: AtomicUsize,
    launch_ids: Mutex<VecDeque<String>>,
    launches: Mutex<Vec<(String, String)>>,
    fail_launches: AtomicBool,
    catalog_down: AtomicBool,
    projects: Mutex<Vec<Project>>,
    suites: Mutex<HashMap<String, Vec<String>>>,
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    checks: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_launches(&self, fail: bool) {
        self.fail_launches.store(fail, Ordering::SeqCst);
    }

    pub fn catalog_down(&self, down: bool) {
        self.catalog_down.store(down, Ordering::SeqCst);
    }

    pub fn next_launch_id(&self, id: &str) {
        self.launch_ids.lock().unwrap().push_back(id.to_string());
    }

    pub fn add_project(&self, name: &str, suites: &[&str]) {
        self.projects.lock().unwrap().push(Project {
            name: name.to_string(),
            url: format!("http://git/{}", name),
        });
        self.suites.lock().unwrap().insert(
            name.to_string(),
            suites.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn script(&self, id: &str, replies: impl IntoIterator<Item = Reply>) {
        self.replies
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .extend(replies);
    }

    pub fn launches(&self) -> Vec<(String, String)> {
        self.launches.lock().unwrap().clone()
    }

    /// Ids passed to `check_status`, in call order
    pub fn checks(&self) -> Vec<String> {
        self.checks.lock().unwrap().clone()
    }

    pub fn checks_for(&self, id: &str) -> usize {
        self.checks.lock().unwrap().iter().filter(|c| *c == id).count()
    }

    fn next_reply(&self, id: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(id)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        if self.catalog_down.load(Ordering::SeqCst) {
            return Err(ClientError::api_error(503, "catalog offline"));
        }
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn list_test_suites(&self, project: &str) -> Result<Vec<String>> {
        if self.catalog_down.load(Ordering::SeqCst) {
            return Err(ClientError::api_error(503, "catalog offline"));
        }
        self.suites
            .lock()
            .unwrap()
            .get(project)
            .cloned()
            .ok_or_else(|| ClientError::api_error(404, format!("unknown project {}", project)))
    }

    async fn launch_run(&self, project: &str, suite_id: &str) -> Result<LaunchResponse> {
        self.launches
            .lock()
            .unwrap()
            .push((project.to_string(), suite_id.to_string()));

        if self.fail_launches.load(Ordering::SeqCst) {
            return Err(ClientError::api_error(500, "launch rejected"));
        }

        let running_id = match self.launch_ids.lock().unwrap().pop_front() {
            Some(id) => id,
            None => format!("r-{}", self.launch_counter.fetch_add(1, Ordering::SeqCst) + 1),
        };

        Ok(LaunchResponse {
            running_id,
            testsuite_id: suite_id.to_string(),
        })
    }

    async fn check_status(&self, run_id: &RunId) -> Result<StatusReport> {
        self.checks.lock().unwrap().push(run_id.to_string());

        match self.next_reply(run_id.as_str()) {
            Some(Reply::Report { report, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(report)
            }
            Some(Reply::Fail) => Err(ClientError::api_error(502, "upstream connection reset")),
            None => Err(ClientError::api_error(404, format!("unknown run {}", run_id))),
        }
    }
}
