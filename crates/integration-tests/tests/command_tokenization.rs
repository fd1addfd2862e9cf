//! Synthesized commands evaluated by a real shell
//!
//! `curl` is shadowed by a shell function, so the tests see exactly the
//! argument vector curl would receive, without any network access.
#![cfg(unix)]

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use volley_core::application::{curl_command, shell_command, ActionRunner};
use volley_core::domain::{
    ActionDetails, Classification, CommandString, HttpMethod, ShellAction, WebAction,
    WebExecutionMode,
};
use volley_core::port::id_provider::SequentialIdProvider;
use volley_core::port::navigator::NoNavigator;
use volley_core::port::time_provider::SystemTimeProvider;
use volley_core::port::{CommandTransport, ExecutionOutcome};
use volley_infra_system::ShellTransport;

/// Prints each argument on its own line as `<arg>`
const ECHO_ARGS_CURL: &str = r#"curl() { for a in "$@"; do printf '<%s>\n' "$a"; done; }; "#;

/// Answers every request with the URL as body and a 201 status marker
const FAKE_CURL: &str =
    r#"curl() { for last; do :; done; printf '%s\nCURL_HTTP_STATUS_CODE:201\n' "$last"; }; "#;

fn shell() -> ShellTransport {
    ShellTransport::new(Arc::new(SystemTimeProvider))
}

async fn run_with_prelude(prelude: &str, command: &CommandString) -> ExecutionOutcome {
    let line = CommandString::raw(format!("{}{}", prelude, command));
    shell().execute(&line, Duration::from_secs(10)).await
}

/// Shell transport with a shell function defined in front of every command
struct PreludeTransport {
    prelude: &'static str,
    inner: ShellTransport,
}

#[async_trait]
impl CommandTransport for PreludeTransport {
    async fn execute(&self, command: &CommandString, timeout: Duration) -> ExecutionOutcome {
        let line = CommandString::raw(format!("{}{}", self.prelude, command));
        self.inner.execute(&line, timeout).await
    }
}

fn web(method: HttpMethod, url: &str) -> WebAction {
    WebAction {
        method,
        url: url.to_string(),
        payload: None,
        headers: BTreeMap::new(),
        execution_mode: WebExecutionMode::RemoteProbe,
    }
}

#[tokio::test]
async fn test_headers_and_payload_survive_shell_evaluation() {
    let mut action = web(HttpMethod::Post, "/login");
    action
        .headers
        .insert("Content-Type".to_string(), "application/json".to_string());
    action
        .headers
        .insert("X-Quote".to_string(), r#"say "hi""#.to_string());
    action.payload = Some(r#"{"user":"o'brien","note":"it's ok"}"#.to_string());

    let command = curl_command(&action, Some("http://x.test/"));
    let outcome = run_with_prelude(ECHO_ARGS_CURL, &command).await;
    assert_eq!(outcome.exit_code, Some(0), "stderr: {}", outcome.stderr);

    let args: Vec<&str> = outcome.stdout.lines().collect();
    assert_eq!(
        args,
        vec![
            "<-s>",
            "<-w>",
            r"<\nCURL_HTTP_STATUS_CODE:%{http_code}\n>",
            "<-X>",
            "<POST>",
            "<-H>",
            "<Content-Type: application/json>",
            "<-H>",
            r#"<X-Quote: say "hi">"#,
            "<-d>",
            r#"<{"user":"o'brien","note":"it's ok"}>"#,
            "<http://x.test/login>",
        ]
    );
}

#[tokio::test]
async fn test_header_values_with_shell_metacharacters_arrive_verbatim() {
    let mut action = web(HttpMethod::Get, "http://x.test/");
    action
        .headers
        .insert("X-Path".to_string(), r#"C:\dir\"q"\"#.to_string());
    action
        .headers
        .insert("X-Vars".to_string(), "$HOME `id` $(id)".to_string());

    let outcome = run_with_prelude(ECHO_ARGS_CURL, &curl_command(&action, None)).await;
    assert_eq!(outcome.exit_code, Some(0), "stderr: {}", outcome.stderr);

    let args: Vec<&str> = outcome.stdout.lines().collect();
    assert!(args.contains(&r#"<X-Path: C:\dir\"q"\>"#), "args: {:?}", args);
    assert!(args.contains(&"<X-Vars: $HOME `id` $(id)>"), "args: {:?}", args);
}

#[tokio::test]
async fn test_url_with_spaces_stays_one_argument() {
    let action = web(HttpMethod::Get, "http://x.test/search?q=a b&lang=é");
    let outcome = run_with_prelude(ECHO_ARGS_CURL, &curl_command(&action, None)).await;

    let last = outcome.stdout.lines().last().unwrap();
    assert_eq!(last, "<http://x.test/search?q=a%20b&lang=%C3%A9>");
}

#[tokio::test]
async fn test_payload_dropped_for_get() {
    let mut action = web(HttpMethod::Get, "http://x.test/");
    action.payload = Some("ignored".to_string());

    let outcome = run_with_prelude(ECHO_ARGS_CURL, &curl_command(&action, None)).await;
    assert!(!outcome.stdout.contains("<-d>"));
    assert!(!outcome.stdout.contains("ignored"));
}

#[tokio::test]
async fn test_shell_script_reaches_bash_unchanged() {
    let script = "V=\"a  b\"\necho \"$V\"\necho `echo tick`\nprintf '%s\\n' 'back\\slash'";
    let command = shell_command(&ShellAction {
        script: script.to_string(),
    });

    let outcome = shell().execute(&command, Duration::from_secs(10)).await;
    assert_eq!(outcome.exit_code, Some(0), "stderr: {}", outcome.stderr);
    assert_eq!(outcome.stdout, "a  b\ntick\nback\\slash\n");
}

#[tokio::test]
async fn test_synthesis_is_deterministic() {
    let mut action = web(HttpMethod::Put, "items/1");
    action.headers.insert("B".to_string(), "2".to_string());
    action.headers.insert("A".to_string(), "1".to_string());
    action.payload = Some("x=1".to_string());

    let first = curl_command(&action, Some("http://x.test"));
    let second = curl_command(&action, Some("http://x.test"));
    assert_eq!(first, second);
    assert!(first.as_str().contains(r#"-H "A: 1" -H "B: 2""#));
}

#[tokio::test]
async fn test_runner_parses_probe_output_from_real_shell() {
    let runner = ActionRunner::new(
        Arc::new(PreludeTransport {
            prelude: FAKE_CURL,
            inner: shell(),
        }),
        Arc::new(NoNavigator),
        Arc::new(SystemTimeProvider),
        Arc::new(SequentialIdProvider::default()),
    );

    let details = ActionDetails::Web(web(HttpMethod::Get, "/status"));
    let record = runner.run(&details, Some("http://x.test/")).await.unwrap();

    assert!(record.succeeded());
    assert_eq!(record.classification(), Classification::Succeeded);
    assert_eq!(record.response_body(), Some("http://x.test/status"));
    let status = record.http_status().unwrap();
    assert_eq!(status.code, 201);
    assert_eq!(status.reason_phrase, "Created");
    assert!(record.warnings().is_empty());
}

#[tokio::test]
async fn test_runner_reports_failing_script() {
    let runner = ActionRunner::new(
        Arc::new(shell()),
        Arc::new(NoNavigator),
        Arc::new(SystemTimeProvider),
        Arc::new(SequentialIdProvider::default()),
    );

    let details = ActionDetails::Shell(ShellAction {
        script: "echo partial\necho 'no such thing' >&2\nexit 4".to_string(),
    });
    let record = runner.run(&details, None).await.unwrap();

    assert!(!record.succeeded());
    assert_eq!(record.classification(), Classification::CommandFailure);
    assert_eq!(record.exit_code(), Some(4));
    assert_eq!(record.raw_stdout(), "partial\n");
    assert_eq!(record.raw_stderr(), "no such thing\n");
    assert!(record.http_status().is_none());
}
