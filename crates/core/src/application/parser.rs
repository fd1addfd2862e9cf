// Result Parser
// Decodes a raw transport outcome into an ExecutionRecord

use crate::application::status::{reason_phrase, reason_phrase_str};
use crate::application::synthesizer::STATUS_MARKER;
use crate::domain::{Classification, ExecutionRecord, HttpStatus};
use crate::port::{ExecutionOutcome, IdProvider, TimeProvider};
use chrono::{DateTime, Local, Utc};
use std::sync::Arc;

/// Result parser with injected clock and id source
pub struct ResultParser {
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
}

impl ResultParser {
    pub fn new(time_provider: Arc<dyn TimeProvider>, id_provider: Arc<dyn IdProvider>) -> Self {
        Self {
            time_provider,
            id_provider,
        }
    }

    /// Parse `outcome`, stamping the record at the moment it is finalized
    pub fn parse(
        &self,
        outcome: ExecutionOutcome,
        was_web_probe: bool,
        command_displayed: &str,
    ) -> ExecutionRecord {
        let id = self.id_provider.generate_id();
        parse(
            outcome,
            was_web_probe,
            command_displayed,
            id,
            self.time_provider.now(),
        )
    }

    /// Record for a browser navigation (no transport involved)
    pub fn navigation(
        &self,
        url: &str,
        result: Result<(), String>,
        warning: Option<String>,
    ) -> ExecutionRecord {
        let id = self.id_provider.generate_id();
        navigation_record(url, result, warning, id, self.time_provider.now())
    }
}

/// Split a probe's stdout into (body, status text) at the last status marker
///
/// The marker normally follows a newline; a marker at offset 0 (empty body)
/// is also accepted.
pub fn split_status_marker(stdout: &str) -> Option<(&str, &str)> {
    let anchored = format!("\n{}", STATUS_MARKER);
    let (body_end, code_start) = match stdout.rfind(&anchored) {
        Some(idx) => (idx, idx + anchored.len()),
        None if stdout.starts_with(STATUS_MARKER) => (0, STATUS_MARKER.len()),
        None => return None,
    };

    let code = stdout[code_start..]
        .trim()
        .split('\n')
        .next()
        .unwrap_or_default()
        .trim();
    Some((stdout[..body_end].trim(), code))
}

/// Turn a transport outcome into a record
///
/// Never fails. The failure taxonomy:
/// - no transport error, exit 0: succeeded
/// - no transport error, non-zero exit or killed: command failure
/// - transport error with a non-zero exit code: command failure
/// - transport error without a usable exit code: transport failure
pub fn parse(
    outcome: ExecutionOutcome,
    was_web_probe: bool,
    command_displayed: &str,
    id: String,
    captured_at: DateTime<Utc>,
) -> ExecutionRecord {
    let ExecutionOutcome {
        stdout,
        stderr,
        exit_code,
        transport_error,
    } = outcome;

    let succeeded = transport_error.is_none() && exit_code == Some(0);
    let classification = match (&transport_error, exit_code) {
        (None, Some(0)) => Classification::Succeeded,
        (None, _) => Classification::CommandFailure,
        (Some(_), Some(code)) if code != 0 => Classification::CommandFailure,
        (Some(_), _) => Classification::TransportFailure,
    };

    let mut warnings = Vec::new();
    if transport_error.is_none() && exit_code.is_none() {
        warnings.push("Process was killed before it exited (timeout or signal)".to_string());
    }

    let (http_status, response_body) = if was_web_probe {
        match split_status_marker(&stdout) {
            Some((body, code_text)) => {
                let status = match code_text.parse::<u16>() {
                    Ok(code) => Some(HttpStatus {
                        code,
                        reason_phrase: reason_phrase(i64::from(code)).to_string(),
                    }),
                    Err(_) => {
                        warnings.push(format!(
                            "Malformed HTTP status marker payload '{}' ({})",
                            code_text,
                            reason_phrase_str(code_text)
                        ));
                        None
                    }
                };
                (status, Some(body.to_string()))
            }
            None => {
                if transport_error.is_none() {
                    warnings.push("HTTP status marker not found in stdout".to_string());
                }
                (None, Some(stdout.clone()))
            }
        }
    } else {
        (None, None)
    };

    ExecutionRecord {
        id,
        command_displayed: command_displayed.to_string(),
        exit_code,
        http_status,
        response_body,
        raw_stdout: stdout,
        raw_stderr: stderr,
        server_message: transport_error,
        succeeded,
        classification,
        warnings,
        captured_at,
        captured_at_display: display_time(captured_at),
    }
}

/// Record for a LocalOpen web action
pub fn navigation_record(
    url: &str,
    result: Result<(), String>,
    warning: Option<String>,
    id: String,
    captured_at: DateTime<Utc>,
) -> ExecutionRecord {
    let (succeeded, classification, server_message) = match result {
        Ok(()) => (true, Classification::Succeeded, None),
        Err(e) => (false, Classification::TransportFailure, Some(e)),
    };

    ExecutionRecord {
        id,
        command_displayed: format!("Browser Action: Open {} in new tab", url),
        exit_code: None,
        http_status: None,
        response_body: None,
        raw_stdout: String::new(),
        raw_stderr: String::new(),
        server_message,
        succeeded,
        classification,
        warnings: warning.into_iter().collect(),
        captured_at,
        captured_at_display: display_time(captured_at),
    }
}

fn display_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string()
}
