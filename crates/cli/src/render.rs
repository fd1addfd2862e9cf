//! Text rendering for execution records and catalog listings

use tabled::Tabled;
use volley_core::domain::{
    ActionDetails, AttackGroup, Classification, Dispatch, ExecutionRecord, HttpMethod,
};

const PREVIEW_CHARS: usize = 100;

/// What produced a record, for wording the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunKind {
    Probe,
    Shell,
    Navigate { url: String, method: HttpMethod },
}

impl RunKind {
    pub fn of(dispatch: &Dispatch) -> Self {
        match dispatch {
            Dispatch::Transport {
                web_probe: true, ..
            } => RunKind::Probe,
            Dispatch::Transport { .. } => RunKind::Shell,
            Dispatch::Navigate { url, method } => RunKind::Navigate {
                url: url.clone(),
                method: *method,
            },
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RunKind::Probe => "Curl Command",
            RunKind::Shell => "Shell Command",
            RunKind::Navigate { .. } => "Browser Action",
        }
    }
}

/// Short multi-line summary of a record
pub fn summary(record: &ExecutionRecord, kind: &RunKind) -> String {
    let mut out = String::new();

    if let RunKind::Navigate { url, method } = kind {
        out.push_str("Attempting to open URL in the system browser...\n");
        out.push_str(&format!("URL: {}\n", url));
        out.push_str(&format!("Method Specified: {}\n", method));
        out.push_str("-------------------------------------\n");
        match record.server_message() {
            None => {
                out.push_str("Successfully requested to open URL.\n");
                out.push_str("Note: This performs a GET request. Defined headers or payload are not sent.\n");
            }
            Some(message) => {
                out.push_str("ERROR: Could not open URL in the browser.\n");
                out.push_str(&format!("Details: {}\n", message));
            }
        }
    } else if let (Some(message), Classification::TransportFailure) =
        (record.server_message(), record.classification())
    {
        out.push_str(&format!("API Error: {}\n", message));
        if !record.raw_stdout().is_empty() {
            out.push_str(&format!("STDOUT (during API error): {}\n", record.raw_stdout()));
        }
        if !record.raw_stderr().is_empty() {
            out.push_str(&format!("STDERR (during API error): {}\n", record.raw_stderr()));
        }
    } else if record.succeeded() {
        out.push_str(&format!(
            "{} Executed Successfully (Exit Code: 0).\n",
            kind.label()
        ));
        if *kind == RunKind::Probe {
            match record.http_status() {
                Some(status) => out.push_str(&format!("HTTP Status: {}.\n", status)),
                None => out.push_str("HTTP Status: Not detected.\n"),
            }
        } else if record.raw_stdout().is_empty() {
            out.push_str("No STDOUT produced.\n");
        } else {
            out.push_str(&format!(
                "Output (first {} chars): {}\n",
                PREVIEW_CHARS,
                preview(record.raw_stdout())
            ));
        }
        if !record.raw_stderr().is_empty() {
            out.push_str(&format!(
                "stderr (may contain progress/info, first line): {}...\n",
                first_line(record.raw_stderr())
            ));
        }
    } else {
        let exit = match record.exit_code() {
            Some(code) => code.to_string(),
            None => "none, killed".to_string(),
        };
        out.push_str(&format!("{} Failed (Exit Code: {}).\n", kind.label(), exit));
        if let Some(status) = record.http_status() {
            out.push_str(&format!("HTTP Status: {}.\n", status));
        }
        if let Some(message) = record.server_message() {
            out.push_str(&format!("Server message: {}\n", message));
        }
        if !record.raw_stderr().is_empty() {
            out.push_str(&format!(
                "Error Details (stderr): {}...\n",
                first_line(record.raw_stderr())
            ));
        } else if !record.raw_stdout().is_empty() {
            out.push_str(&format!("Output (stdout): {}\n", preview(record.raw_stdout())));
        } else {
            out.push_str("No output on stdout or stderr for failed command.\n");
        }
    }

    for warning in record.warnings() {
        out.push_str(&format!("WARNING: {}\n", warning));
    }
    out.push_str(record.captured_at_display());
    out
}

/// Full log of a record (command, exit code, status, raw streams)
pub fn details(record: &ExecutionRecord) -> String {
    let exit = record
        .exit_code()
        .map_or_else(|| "N/A".to_string(), |c| c.to_string());
    let mut out = format!(
        "COMMAND EXECUTED:\n{}\n\nEXIT CODE: {}\n\n",
        record.command_displayed(),
        exit
    );

    match record.response_body() {
        Some(body) => {
            let status = record
                .http_status()
                .map_or_else(|| "Not detected".to_string(), |s| s.to_string());
            out.push_str(&format!("DETECTED HTTP STATUS: {}\n\n", status));
            out.push_str(&format!(
                "RESPONSE BODY (from STDOUT):\n{}\n\n",
                or_empty(body)
            ));
        }
        None => out.push_str(&format!("STDOUT:\n{}\n\n", or_empty(record.raw_stdout()))),
    }
    out.push_str(&format!("RAW STDERR:\n{}\n", or_empty(record.raw_stderr())));
    if let Some(message) = record.server_message() {
        out.push_str(&format!("\nSERVER MESSAGE:\n{}\n", message));
    }
    out
}

fn preview(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", head)
    } else {
        head
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn or_empty(text: &str) -> &str {
    if text.is_empty() {
        "(empty)"
    } else {
        text
    }
}

/// One row of `volley list`
#[derive(Tabled)]
pub struct ActionRow {
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Runs On")]
    pub mode: String,
}

pub fn action_rows(groups: &[AttackGroup]) -> Vec<ActionRow> {
    groups
        .iter()
        .flat_map(|group| {
            group.actions.iter().map(move |action| ActionRow {
                group: group.name.clone(),
                id: action.id.clone(),
                name: action.name.clone(),
                kind: action.details.kind_label(),
                mode: match &action.details {
                    ActionDetails::Web(web) => web.execution_mode.to_string(),
                    ActionDetails::Shell(_) => "Server (shell)".to_string(),
                },
            })
        })
        .collect()
}
