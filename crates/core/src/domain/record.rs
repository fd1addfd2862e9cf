// Execution Record Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record ID (UUID v4)
pub type RecordId = String;

/// How an execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Succeeded,
    /// The command ran and failed on its own terms (non-zero exit, killed)
    CommandFailure,
    /// The command could not be run, or the executor could not be reached
    TransportFailure,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Succeeded => write!(f, "SUCCEEDED"),
            Classification::CommandFailure => write!(f, "COMMAND_FAILURE"),
            Classification::TransportFailure => write!(f, "TRANSPORT_FAILURE"),
        }
    }
}

/// HTTP status recovered from the probe's status marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStatus {
    pub code: u16,
    pub reason_phrase: String,
}

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.code, self.reason_phrase)
    }
}

/// Structured result of one execution, ready for display.
///
/// Built once by the result parser and never modified afterwards, so every
/// field is read through an accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub(crate) id: RecordId,
    pub(crate) command_displayed: String,
    pub(crate) exit_code: Option<i32>,
    pub(crate) http_status: Option<HttpStatus>,
    pub(crate) response_body: Option<String>,
    pub(crate) raw_stdout: String,
    pub(crate) raw_stderr: String,
    pub(crate) server_message: Option<String>,
    pub(crate) succeeded: bool,
    pub(crate) classification: Classification,
    pub(crate) warnings: Vec<String>,
    pub(crate) captured_at: DateTime<Utc>,
    pub(crate) captured_at_display: String,
}

impl ExecutionRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn command_displayed(&self) -> &str {
        &self.command_displayed
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn http_status(&self) -> Option<&HttpStatus> {
        self.http_status.as_ref()
    }

    pub fn response_body(&self) -> Option<&str> {
        self.response_body.as_deref()
    }

    pub fn raw_stdout(&self) -> &str {
        &self.raw_stdout
    }

    pub fn raw_stderr(&self) -> &str {
        &self.raw_stderr
    }

    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Machine-sortable capture time (UTC)
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Human-readable capture time (local time zone, same instant)
    pub fn captured_at_display(&self) -> &str {
        &self.captured_at_display
    }
}
