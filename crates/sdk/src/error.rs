//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({code}): {message}")]
    Rpc {
        code: i32,
        message: String,
        /// Raw `data` member of the error object, if any
        data: Option<serde_json::Value>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => SdkError::Rpc {
                code: call_err.code(),
                message: call_err.message().to_string(),
                data: call_err
                    .data()
                    .and_then(|raw| serde_json::from_str(raw.get()).ok()),
            },
            jsonrpsee::core::ClientError::Transport(e) => SdkError::Transport(e.to_string()),
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::RequestTimeout => {
                SdkError::Timeout("no response from the execution service".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => {
                SdkError::Other(format!("Parse error: {}", e))
            }
            _ => SdkError::Other(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::types::ErrorObjectOwned;
    use serde_json::json;

    #[test]
    fn test_call_error_keeps_code_and_data() {
        let call = ErrorObjectOwned::owned(
            5002,
            "Command execution failed",
            Some(json!({"error": "Spawn failed", "stderr": "x"})),
        );
        match SdkError::from(jsonrpsee::core::ClientError::Call(call)) {
            SdkError::Rpc {
                code,
                message,
                data,
            } => {
                assert_eq!(code, 5002);
                assert_eq!(message, "Command execution failed");
                assert_eq!(data.unwrap()["error"], "Spawn failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_call_error_without_data() {
        let call = ErrorObjectOwned::owned(4000, "Command must be a non-empty string.", None::<()>);
        let err = SdkError::from(jsonrpsee::core::ClientError::Call(call));
        assert!(matches!(err, SdkError::Rpc { code: 4000, data: None, .. }));
        assert_eq!(
            err.to_string(),
            "RPC error (4000): Command must be a non-empty string."
        );
    }
}
