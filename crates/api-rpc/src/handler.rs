//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{to_rpc_error, transport_failure, EMPTY_COMMAND};
use crate::types::{ExecRequest, ExecResponse, HealthResponse};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};
use volley_core::domain::CommandString;
use volley_core::port::{CommandTransport, DEFAULT_TIMEOUT};
use volley_core::CoreError;

/// Execution limits enforced by the service
#[derive(Debug, Clone, Copy)]
pub struct ExecLimits {
    /// Used when a request carries no timeout (or 0)
    pub default_timeout: Duration,
    /// Upper bound for requested timeouts
    pub max_timeout: Duration,
    /// Commands running at once; further requests wait
    pub max_concurrent: usize,
}

impl Default for ExecLimits {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            max_timeout: Duration::from_secs(300),
            max_concurrent: 16,
        }
    }
}

impl ExecLimits {
    fn timeout_for(&self, requested_ms: Option<u64>) -> Duration {
        match requested_ms {
            Some(ms) if ms > 0 => Duration::from_millis(ms).min(self.max_timeout),
            _ => self.default_timeout,
        }
    }
}

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    transport: Arc<dyn CommandTransport>,
    permits: Arc<Semaphore>,
    limits: ExecLimits,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(transport: Arc<dyn CommandTransport>, limits: ExecLimits) -> Self {
        // A zero-permit gate would park every request forever
        let max_concurrent = limits.max_concurrent.max(1);
        Self {
            transport,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            limits: ExecLimits {
                max_concurrent,
                ..limits
            },
            start_time: Instant::now(),
        }
    }

    /// exec.run.v1
    ///
    /// A command that exits non-zero or is killed is still a result. Only a
    /// command that could not be run becomes an error (5002).
    pub async fn exec(&self, params: ExecRequest) -> Result<ExecResponse, ErrorObjectOwned> {
        if params.command.trim().is_empty() {
            return Err(to_rpc_error(CoreError::Precondition(
                EMPTY_COMMAND.to_string(),
            )));
        }

        let timeout = self.limits.timeout_for(params.timeout_ms);
        let _permit = self.permits.acquire().await.map_err(|_| {
            to_rpc_error(CoreError::Internal(
                "Execution service is shutting down".to_string(),
            ))
        })?;

        info!(
            command = %params.command,
            timeout_ms = timeout.as_millis() as u64,
            "Executing command"
        );
        let outcome = self
            .transport
            .execute(&CommandString::raw(params.command), timeout)
            .await;

        if let Some(error) = &outcome.transport_error {
            warn!(error = %error, "Execution error");
            return Err(transport_failure(outcome));
        }
        if outcome.exit_code != Some(0) {
            warn!(
                exit_code = ?outcome.exit_code,
                stderr_bytes = outcome.stderr.len(),
                "Command did not succeed"
            );
        }

        Ok(ExecResponse::from(outcome))
    }

    /// system.health.v1
    pub async fn health(&self) -> Result<HealthResponse, ErrorObjectOwned> {
        Ok(HealthResponse {
            version: volley_core::VERSION.to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            max_concurrent: self.limits.max_concurrent,
            available_permits: self.permits.available_permits(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use crate::types::ExecFailureData;
    use tokio_test::{assert_err, assert_ok};
    use volley_core::port::command_transport::mocks::ScriptedTransport;
    use volley_core::port::ExecutionOutcome;

    fn handler(transport: Arc<ScriptedTransport>) -> RpcHandler {
        RpcHandler::new(transport, ExecLimits::default())
    }

    fn request(command: &str, timeout_ms: Option<u64>) -> ExecRequest {
        ExecRequest {
            command: command.to_string(),
            timeout_ms,
        }
    }

    #[tokio::test]
    async fn test_exec_success() {
        let transport = Arc::new(ScriptedTransport::new_success("hello\n"));
        let resp = assert_ok!(handler(transport.clone()).exec(request("echo hello", None)).await);

        assert_eq!(resp.stdout, "hello\n");
        assert_eq!(resp.exit_code, Some(0));
        assert_eq!(transport.commands(), vec!["echo hello".to_string()]);
        assert_eq!(transport.timeouts(), vec![DEFAULT_TIMEOUT]);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_a_result() {
        let transport = Arc::new(ScriptedTransport::new(ExecutionOutcome::exited(
            "", "boom", 2,
        )));
        let resp = assert_ok!(handler(transport).exec(request("false", None)).await);
        assert_eq!(resp.exit_code, Some(2));
        assert_eq!(resp.stderr, "boom");
    }

    #[tokio::test]
    async fn test_empty_command_rejected_before_transport() {
        let transport = Arc::new(ScriptedTransport::new_success(""));
        let err = assert_err!(handler(transport.clone()).exec(request("  \n", None)).await);

        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert_eq!(err.message(), EMPTY_COMMAND);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_system_error() {
        let transport = Arc::new(ScriptedTransport::new_unreachable("no shell"));
        let err = assert_err!(handler(transport).exec(request("id", None)).await);

        assert_eq!(err.code(), code::SYSTEM_ERROR);
        let data: ExecFailureData = serde_json::from_str(err.data().unwrap().get()).unwrap();
        assert!(data.error.contains("no shell"));
    }

    #[tokio::test]
    async fn test_requested_timeout_is_clamped() {
        let transport = Arc::new(ScriptedTransport::new_success(""));
        let handler = handler(transport.clone());

        assert_ok!(handler.exec(request("true", Some(1500))).await);
        assert_ok!(handler.exec(request("true", Some(10_000_000))).await);
        assert_ok!(handler.exec(request("true", Some(0))).await);

        assert_eq!(
            transport.timeouts(),
            vec![
                Duration::from_millis(1500),
                Duration::from_secs(300),
                DEFAULT_TIMEOUT
            ]
        );
    }

    #[tokio::test]
    async fn test_health_reports_capacity() {
        let handler = RpcHandler::new(
            Arc::new(ScriptedTransport::new_success("")),
            ExecLimits {
                max_concurrent: 0,
                ..ExecLimits::default()
            },
        );
        let health = assert_ok!(handler.health().await);
        assert_eq!(health.version, volley_core::VERSION);
        assert_eq!(health.max_concurrent, 1);
        assert_eq!(health.available_permits, 1);
    }
}
