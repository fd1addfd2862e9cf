// Command Transport Port
// Abstraction for running a command line on the execution host (local or remote)

use crate::domain::CommandString;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Hard timeout applied when the caller does not pick one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw result of running one command
///
/// `exit_code = None` without a `transport_error` means the process was
/// killed (timeout or signal) instead of exiting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub transport_error: Option<String>,
}

impl ExecutionOutcome {
    /// Process exited on its own (any exit code, zero or not)
    pub fn exited(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
            transport_error: None,
        }
    }

    /// Process was terminated before it exited; output is whatever was captured
    pub fn killed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: None,
            transport_error: None,
        }
    }

    /// The command could not be run at all
    pub fn transport_failure(error: &TransportError) -> Self {
        Self {
            transport_error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn was_killed(&self) -> bool {
        self.exit_code.is_none() && self.transport_error.is_none()
    }
}

/// Transport errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Command Transport trait
///
/// Implementations:
/// - ShellTransport: runs the command through a local shell
/// - RemoteTransport: forwards the command to the execution service
///
/// Failures never surface as `Err`: they are reported through
/// `ExecutionOutcome::transport_error`, and a non-zero exit code is a normal
/// outcome. The command string is executed with full shell interpretation
/// and no sandboxing.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Run `command` and wait for it, at most `timeout`
    async fn execute(&self, command: &CommandString, timeout: Duration) -> ExecutionOutcome;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Transport that replays a fixed outcome and records every command it saw
    pub struct ScriptedTransport {
        outcome: ExecutionOutcome,
        seen: Arc<Mutex<Vec<(String, Duration)>>>,
    }

    impl ScriptedTransport {
        pub fn new(outcome: ExecutionOutcome) -> Self {
            Self {
                outcome,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success(stdout: impl Into<String>) -> Self {
            Self::new(ExecutionOutcome::exited(stdout, "", 0))
        }

        pub fn new_unreachable(message: impl Into<String>) -> Self {
            Self::new(ExecutionOutcome::transport_failure(
                &TransportError::Connection(message.into()),
            ))
        }

        pub fn call_count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        pub fn commands(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|(c, _)| c.clone())
                .collect()
        }

        pub fn timeouts(&self) -> Vec<Duration> {
            self.seen.lock().unwrap().iter().map(|(_, t)| *t).collect()
        }
    }

    #[async_trait]
    impl CommandTransport for ScriptedTransport {
        async fn execute(&self, command: &CommandString, timeout: Duration) -> ExecutionOutcome {
            self.seen
                .lock()
                .unwrap()
                .push((command.as_str().to_string(), timeout));
            self.outcome.clone()
        }
    }
}
