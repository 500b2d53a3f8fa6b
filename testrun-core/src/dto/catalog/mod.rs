//! Catalog DTOs

use serde::{Deserialize, Serialize};

/// Payload of `GET /testsuites`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestSuiteList {
    pub testsuites: Vec<String>,
}
