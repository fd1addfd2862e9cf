//! RPC Request/Response Types
//!
//! Wire shapes for the execution service methods. Output fields keep the
//! `exitCode` spelling used by existing clients.

use serde::{Deserialize, Serialize};
use volley_core::port::ExecutionOutcome;

/// exec.run.v1 - Run a command line on this host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecRequest {
    pub command: String,
    /// Clamped to the server's maximum; the server default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Output of a command that ran (success, non-zero exit, or killed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResponse {
    pub stdout: String,
    pub stderr: String,
    /// `null` when the process was killed before exiting
    #[serde(rename = "exitCode")]
    pub exit_code: Option<i32>,
}

impl From<ExecutionOutcome> for ExecResponse {
    fn from(outcome: ExecutionOutcome) -> Self {
        Self {
            stdout: outcome.stdout,
            stderr: outcome.stderr,
            exit_code: outcome.exit_code,
        }
    }
}

/// `data` attached to a 5002 error when the command could not be run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecFailureData {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(rename = "exitCode", default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// system.health.v1 - Service liveness and capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub version: String,
    pub uptime_seconds: u64,
    pub max_concurrent: usize,
    pub available_permits: usize,
}
