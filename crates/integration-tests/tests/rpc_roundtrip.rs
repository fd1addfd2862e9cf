//! Execution service end to end: RPC server + shell transport + SDK client
#![cfg(unix)]

use jsonrpsee::server::ServerHandle;
use std::sync::Arc;
use std::time::Duration;

use volley_api_rpc::{ExecLimits, RpcServer, RpcServerConfig};
use volley_core::application::ActionRunner;
use volley_core::domain::{ActionDetails, Classification, CommandString, ShellAction};
use volley_core::port::id_provider::SequentialIdProvider;
use volley_core::port::navigator::NoNavigator;
use volley_core::port::time_provider::SystemTimeProvider;
use volley_core::port::CommandTransport;
use volley_infra_system::ShellTransport;
use volley_sdk::{ExecFailureData, RemoteTransport, SdkError, VolleyClient};

async fn start_service(transport: ShellTransport, limits: ExecLimits) -> (ServerHandle, String) {
    let config = RpcServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        limits,
    };
    let (handle, addr) = RpcServer::new(config, Arc::new(transport))
        .start()
        .await
        .unwrap();
    (handle, format!("http://{}", addr))
}

fn shell() -> ShellTransport {
    ShellTransport::new(Arc::new(SystemTimeProvider))
}

#[tokio::test]
async fn test_exec_success() {
    let (handle, url) = start_service(shell(), ExecLimits::default()).await;
    let client = VolleyClient::connect(&url).await.unwrap();

    let output = client.exec("echo hello", None).await.unwrap();
    assert_eq!(output.stdout, "hello\n");
    assert_eq!(output.stderr, "");
    assert_eq!(output.exit_code, Some(0));

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_command_failure_is_a_result() {
    let (handle, url) = start_service(shell(), ExecLimits::default()).await;
    let client = VolleyClient::connect(&url).await.unwrap();

    let output = client
        .exec("echo out; echo oops >&2; exit 7", None)
        .await
        .unwrap();
    assert_eq!(output.exit_code, Some(7));
    assert_eq!(output.stdout, "out\n");
    assert_eq!(output.stderr, "oops\n");

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_empty_command_is_validation_error() {
    let (handle, url) = start_service(shell(), ExecLimits::default()).await;
    let client = VolleyClient::connect(&url).await.unwrap();

    match client.exec("   ", None).await {
        Err(SdkError::Rpc { code, message, .. }) => {
            assert_eq!(code, 4000);
            assert_eq!(message, "Command must be a non-empty string.");
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_timeout_returns_partial_output_and_null_exit_code() {
    let (handle, url) = start_service(shell(), ExecLimits::default()).await;
    let client = VolleyClient::connect(&url).await.unwrap();

    let started = std::time::Instant::now();
    let output = client
        .exec("echo partial; sleep 10", Some(Duration::from_millis(300)))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(output.exit_code, None);
    assert_eq!(output.stdout, "partial\n");

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_spawn_failure_is_system_error_with_data() {
    let (handle, url) = start_service(
        shell().with_shell("/nonexistent/shell"),
        ExecLimits::default(),
    )
    .await;
    let client = VolleyClient::connect(&url).await.unwrap();

    match client.exec("id", None).await {
        Err(SdkError::Rpc { code, data, .. }) => {
            assert_eq!(code, 5002);
            let data: ExecFailureData = serde_json::from_value(data.unwrap()).unwrap();
            assert!(data.error.starts_with("Spawn failed"));
        }
        other => panic!("expected system error, got {:?}", other),
    }

    let transport = RemoteTransport::new(client);
    let outcome = transport
        .execute(&CommandString::raw("id"), Duration::from_secs(5))
        .await;
    assert!(outcome.transport_error.unwrap().starts_with("Spawn failed"));
    assert_eq!(outcome.exit_code, None);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_health() {
    let limits = ExecLimits {
        max_concurrent: 3,
        ..ExecLimits::default()
    };
    let (handle, url) = start_service(shell(), limits).await;
    let client = VolleyClient::connect(&url).await.unwrap();

    let health = client.health().await.unwrap();
    assert_eq!(health.version, volley_core::VERSION);
    assert_eq!(health.max_concurrent, 3);
    assert_eq!(health.available_permits, 3);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_runner_over_remote_transport() {
    let (handle, url) = start_service(shell(), ExecLimits::default()).await;
    let runner = ActionRunner::new(
        Arc::new(RemoteTransport::connect(&url).await.unwrap()),
        Arc::new(NoNavigator),
        Arc::new(SystemTimeProvider),
        Arc::new(SequentialIdProvider::default()),
    )
    .with_timeout(Duration::from_secs(10));

    let details = ActionDetails::Shell(ShellAction {
        script: "echo \"$((6 * 7))\"".to_string(),
    });
    let record = runner.run(&details, None).await.unwrap();

    assert!(record.succeeded());
    assert_eq!(record.raw_stdout(), "42\n");
    assert_eq!(record.command_displayed(), r#"bash -c "echo \"\$((6 * 7))\"""#);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    // Nothing listens on port 1
    let runner = ActionRunner::new(
        Arc::new(RemoteTransport::connect("http://127.0.0.1:1").await.unwrap()),
        Arc::new(NoNavigator),
        Arc::new(SystemTimeProvider),
        Arc::new(SequentialIdProvider::default()),
    );

    let record = runner
        .run_command(CommandString::raw("id"))
        .await
        .unwrap();

    assert!(!record.succeeded());
    assert_eq!(record.classification(), Classification::TransportFailure);
    assert!(record.server_message().is_some());
    assert!(record.warnings().is_empty());
}
