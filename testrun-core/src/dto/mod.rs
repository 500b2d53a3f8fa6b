//! Data Transfer Objects for the gateway API
//!
//! Field names here follow the gateway's JSON exactly and must not be
//! renamed. Every gateway response wraps its payload in a `data` envelope.

pub mod catalog;
pub mod run;

use serde::{Deserialize, Serialize};

/// `{ "data": ... }` wrapper used by every gateway response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}
