//! Error types for the tracking engine

use testrun_client::ClientError;
use testrun_core::domain::run::RunId;
use thiserror::Error;

/// Errors surfaced (or logged) by the tracking engine
///
/// Only `CatalogUnavailable`, `LaunchFailed`, `InvalidRequest` and `Config`
/// reach callers. `PollTransientFailure` is built by the scheduler purely to
/// be logged; the next tick retries on its own.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Listing projects or test suites failed
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[source] ClientError),

    /// The gateway could not start the run; nothing was registered
    #[error("Failed to launch suite '{suite_id}' of project '{project}': {source}")]
    LaunchFailed {
        project: String,
        suite_id: String,
        #[source]
        source: ClientError,
    },

    /// A single status check failed
    #[error("Status check for run {run_id} failed: {source}")]
    PollTransientFailure {
        run_id: RunId,
        #[source]
        source: ClientError,
    },

    /// Rejected before any gateway call was made
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration did not validate
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, TrackerError>;
