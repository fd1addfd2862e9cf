//! RPC Error Types
//!
//! Maps core errors and transport failures to JSON-RPC error codes.

use crate::types::ExecFailureData;
use jsonrpsee::types::ErrorObjectOwned;
use volley_core::port::ExecutionOutcome;
use volley_core::CoreError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SYSTEM_ERROR: i32 = 5002;
}

pub const EMPTY_COMMAND: &str = "Command must be a non-empty string.";

/// Convert CoreError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: CoreError) -> ErrorObjectOwned {
    match err {
        CoreError::Precondition(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        CoreError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        CoreError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        CoreError::Io(e) => ErrorObjectOwned::owned(code::SYSTEM_ERROR, e.to_string(), None::<()>),
        CoreError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        CoreError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

/// 5002 error for a command that could not be run, carrying what was captured
pub fn transport_failure(outcome: ExecutionOutcome) -> ErrorObjectOwned {
    let error = outcome
        .transport_error
        .unwrap_or_else(|| "Command execution failed".to_string());
    let message = format!("Command execution failed: {}", error);
    let data = ExecFailureData {
        error,
        stdout: Some(outcome.stdout).filter(|s| !s.is_empty()),
        stderr: Some(outcome.stderr).filter(|s| !s.is_empty()),
        exit_code: outcome.exit_code,
    };
    ErrorObjectOwned::owned(code::SYSTEM_ERROR, message, Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_core::port::TransportError;

    #[test]
    fn test_core_error_codes() {
        let err = to_rpc_error(CoreError::Precondition(EMPTY_COMMAND.to_string()));
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert_eq!(err.message(), EMPTY_COMMAND);

        assert_eq!(
            to_rpc_error(CoreError::NotFound("x".to_string())).code(),
            code::NOT_FOUND
        );
        assert_eq!(
            to_rpc_error(CoreError::Internal("x".to_string())).code(),
            code::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_transport_failure_carries_data() {
        let outcome =
            ExecutionOutcome::transport_failure(&TransportError::SpawnFailed("no shell".into()));
        let err = transport_failure(outcome);

        assert_eq!(err.code(), code::SYSTEM_ERROR);
        let data: ExecFailureData = serde_json::from_str(err.data().unwrap().get()).unwrap();
        assert_eq!(data.error, "Spawn failed: no shell");
        assert!(data.stdout.is_none());
        assert!(data.exit_code.is_none());
    }
}
