//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use serde::{Deserialize, Serialize};

/// Output of a command the service ran
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecResponse {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed (timeout or signal)
    #[serde(rename = "exitCode")]
    pub exit_code: Option<i32>,
}

/// `data` of a 5002 error: the command could not be run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecFailureData {
    pub error: String,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(rename = "exitCode", default)]
    pub exit_code: Option<i32>,
}

/// Response from system.health.v1
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub version: String,
    pub uptime_seconds: u64,
    pub max_concurrent: usize,
    pub available_permits: usize,
}
