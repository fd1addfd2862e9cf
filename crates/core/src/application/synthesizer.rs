// Command Synthesizer
// Turns an action definition into the exact command line the transport runs

use crate::application::target::{encode_uri, resolve_target};
use crate::domain::{
    ActionDetails, CommandString, Dispatch, ShellAction, WebAction, WebExecutionMode,
};
use crate::error::{CoreError, Result};

/// Prefix of the status line curl appends after the response body
pub const STATUS_MARKER: &str = "CURL_HTTP_STATUS_CODE:";

/// Check the preconditions synthesis relies on (callers run this first)
///
/// # Errors
/// - CoreError::Precondition for an empty URL or an empty script
pub fn validate(details: &ActionDetails) -> Result<()> {
    match details {
        ActionDetails::Web(web) if web.url.trim().is_empty() => Err(CoreError::Precondition(
            "Web action URL cannot be empty".to_string(),
        )),
        ActionDetails::Shell(shell) if shell.script.trim().is_empty() => Err(
            CoreError::Precondition("Shell action script cannot be empty".to_string()),
        ),
        _ => Ok(()),
    }
}

/// Decide how an action is dispatched
///
/// Remote probes and shell scripts become transport commands; browser-mode
/// web actions only carry the resolved URL for the navigator.
pub fn synthesize(details: &ActionDetails, default_base: Option<&str>) -> Dispatch {
    match details {
        ActionDetails::Web(web) => match web.execution_mode {
            WebExecutionMode::RemoteProbe => Dispatch::Transport {
                command: curl_command(web, default_base),
                web_probe: true,
            },
            WebExecutionMode::LocalOpen => Dispatch::Navigate {
                url: resolve_target(&web.url, default_base),
                method: web.method,
            },
        },
        ActionDetails::Shell(shell) => Dispatch::Transport {
            command: shell_command(shell),
            web_probe: false,
        },
    }
}

/// Build the curl probe for a web action
///
/// Layout: `curl -s -w "<marker>" -X <METHOD> [-H "k: v"]... [-d '<payload>'] "<url>"`.
/// Headers come out in key order. The payload is only attached for
/// POST/PUT/PATCH.
pub fn curl_command(web: &WebAction, default_base: Option<&str>) -> CommandString {
    let mut cmd = format!(
        r#"curl -s -w "\n{}%{{http_code}}\n" -X {}"#,
        STATUS_MARKER, web.method
    );

    for (key, value) in &web.headers {
        cmd.push_str(&format!(
            r#" -H "{}: {}""#,
            escape_for_double_quoted_arg(key),
            escape_for_double_quoted_arg(value)
        ));
    }

    if let Some(payload) = web.payload.as_deref() {
        if !payload.is_empty() && web.method.carries_body() {
            cmd.push_str(&format!(" -d '{}'", escape_single_quoted(payload)));
        }
    }

    let url = resolve_target(&web.url, default_base);
    cmd.push_str(&format!(r#" "{}""#, encode_uri(&url)));

    CommandString::synthesized(cmd)
}

/// Wrap a script as `bash -c "<script>"`
pub fn shell_command(shell: &ShellAction) -> CommandString {
    CommandString::synthesized(format!(
        r#"bash -c "{}""#,
        escape_for_double_quoted_arg(&shell.script)
    ))
}

/// Close the quote, emit an escaped quote, reopen
fn escape_single_quoted(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Backslashes must go first, otherwise the later escapes get doubled
fn escape_for_double_quoted_arg(script: &str) -> String {
    script
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}
