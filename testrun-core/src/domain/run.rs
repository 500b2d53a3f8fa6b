//! Run domain types
//!
//! A run is one remote execution of a test suite. The gateway assigns its id
//! at launch time and reports its progress through status records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque run identifier assigned by the gateway (`running_id` / `id_test`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// What was launched. Immutable once the run exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub run_id: RunId,
    pub suite_id: String,
    pub project_name: String,
    pub launched_at: DateTime<Utc>,
}

/// Status of a run as reported by the gateway
///
/// Encoded on the wire as an integer. Codes the tracker does not recognise are
/// kept as `Unknown` and treated as still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum StatusCode {
    Queued,
    Running,
    Done,
    Failed,
    Unknown(i64),
}

impl StatusCode {
    /// Whether no further change can happen for this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusCode::Done | StatusCode::Failed)
    }

    /// Position in the lifecycle order; `None` for unknown codes
    ///
    /// Done and Failed share a rank: they are incomparable siblings.
    pub fn rank(&self) -> Option<u8> {
        match self {
            StatusCode::Queued => Some(0),
            StatusCode::Running => Some(1),
            StatusCode::Done | StatusCode::Failed => Some(2),
            StatusCode::Unknown(_) => None,
        }
    }

    /// True when `self` comes strictly before `other` in the lifecycle
    pub fn precedes(&self, other: &StatusCode) -> bool {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    pub fn code(&self) -> i64 {
        i64::from(*self)
    }
}

impl From<i64> for StatusCode {
    fn from(code: i64) -> Self {
        match code {
            1 => StatusCode::Queued,
            2 => StatusCode::Running,
            3 => StatusCode::Done,
            4 => StatusCode::Failed,
            other => StatusCode::Unknown(other),
        }
    }
}

impl From<StatusCode> for i64 {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::Queued => 1,
            StatusCode::Running => 2,
            StatusCode::Done => 3,
            StatusCode::Failed => 4,
            StatusCode::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusCode::Queued => write!(f, "Queued"),
            StatusCode::Running => write!(f, "Running"),
            StatusCode::Done => write!(f, "Done"),
            StatusCode::Failed => write!(f, "Failed"),
            StatusCode::Unknown(code) => write!(f, "Unknown({})", code),
        }
    }
}

/// Latest known state of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: StatusCode,

    /// Monotonic counter from the gateway, used to discard stale replies
    pub checkpoint: u64,

    /// Advisory fields, never used for control flow
    pub progress: Option<f64>,
    pub step_name: Option<String>,
    pub total_steps: Option<u32>,

    /// Report location, present once the run is terminal
    pub report_file: Option<String>,
}

impl StatusRecord {
    /// Record seeded for a freshly launched run
    pub fn queued() -> Self {
        Self::new(StatusCode::Queued, 0)
    }

    pub fn new(status: StatusCode, checkpoint: u64) -> Self {
        Self {
            status,
            checkpoint,
            progress: None,
            step_name: None,
            total_steps: None,
            report_file: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Registry entry: what was launched plus its latest status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRun {
    pub run: Run,
    pub record: StatusRecord,

    /// Highest recognised status the run has held, kept while the gateway
    /// reports unknown codes
    pub last_known: StatusCode,

    pub updated_at: DateTime<Utc>,
}
