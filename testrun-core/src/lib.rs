//! Testrun Core
//!
//! Core types shared by the test run tracker crates.
//!
//! This crate contains:
//! - Domain types: runs, status records and catalog entries
//! - DTOs: wire shapes exchanged with the test runner gateway

pub mod domain;
pub mod dto;
