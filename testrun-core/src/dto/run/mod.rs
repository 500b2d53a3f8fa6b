//! Run DTOs for launch and status check

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::domain::run::{RunId, StatusCode, StatusRecord};

/// Body of `POST /automation/run`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub testsuite_id: String,
    pub project: String,
}

/// Payload returned by `POST /automation/run`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchResponse {
    pub running_id: String,
    pub testsuite_id: String,
}

/// Body of `POST /automation/check-status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStatusRequest {
    pub id_test: String,
}

/// Payload returned by `POST /automation/check-status`
///
/// Only `id_test`, `status` and `checkpoint` are mandatory; the descriptive
/// fields may be missing or null.
///
/// `checkpoint` must be a non-negative whole number. `3.0` is accepted as 3;
/// a negative or fractional checkpoint fails the whole reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub id_test: String,
    pub status: StatusCode,
    #[serde(deserialize_with = "checkpoint_from_wire")]
    pub checkpoint: u64,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub step_name: Option<String>,
    #[serde(default)]
    pub total_steps: Option<u32>,
    #[serde(default)]
    pub report_file: Option<String>,
}

impl StatusReport {
    pub fn run_id(&self) -> RunId {
        RunId::new(self.id_test.clone())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireCheckpoint {
    Whole(u64),
    Number(f64),
}

fn checkpoint_from_wire<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match WireCheckpoint::deserialize(deserializer)? {
        WireCheckpoint::Whole(value) => Ok(value),
        WireCheckpoint::Number(value)
            if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 =>
        {
            Ok(value as u64)
        }
        WireCheckpoint::Number(value) => Err(de::Error::custom(format!(
            "checkpoint must be a non-negative integer, got {}",
            value
        ))),
    }
}

impl From<StatusReport> for StatusRecord {
    fn from(report: StatusReport) -> Self {
        StatusRecord {
            status: report.status,
            checkpoint: report.checkpoint,
            progress: report.progress,
            step_name: report.step_name,
            total_steps: report.total_steps,
            report_file: report.report_file,
        }
    }
}
