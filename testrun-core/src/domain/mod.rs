//! Core domain types
//!
//! These types describe what the tracker knows about remote test runs.
//! They are shared between the HTTP client (which decodes them) and the
//! tracking engine (which stores and merges them).

pub mod project;
pub mod run;
