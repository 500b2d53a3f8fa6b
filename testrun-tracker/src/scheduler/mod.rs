//! Scheduler layer for the tracker
//!
//! This layer owns the polling cadence. It decides on every tick which runs
//! still need a status check and feeds the replies back into the registry.

pub mod poller;

pub use poller::StatusPoller;
