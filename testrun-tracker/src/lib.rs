//! Testrun Tracker
//!
//! Tracks remote test runs from launch to completion.
//!
//! Architecture:
//! - Gateway: port onto the test runner backend (HTTP client in production)
//! - Registry: latest known status of every launched run
//! - Policy: pure rules deciding which status updates are accepted
//! - Scheduler: timer-driven poller issuing status checks for unfinished runs
//! - Launcher: starts runs and seeds the registry
//!
//! [`Tracker`] wires these together behind a small API: launch runs, read
//! snapshots or subscribe to changes, and start/stop polling.

pub mod config;
pub mod error;
pub mod gateway;
pub mod launcher;
pub mod policy;
pub mod registry;
pub mod scheduler;
mod tracker;

#[cfg(test)]
mod testing;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use gateway::Gateway;
pub use policy::{MergeVerdict, merge};
pub use registry::{RegistryEvent, RunRegistry};
pub use tracker::Tracker;
