//! Volley Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{ExecFailureData, ExecResponse, HealthResponse};
use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;
use tracing::{debug, warn};
use volley_core::domain::CommandString;
use volley_core::port::{CommandTransport, ExecutionOutcome, TransportError};

/// Deadline for calls that carry no command timeout (health, service default)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(310);

/// Extra time granted on top of the command timeout for the round trip
const RESPONSE_GRACE: Duration = Duration::from_secs(5);

/// Upper bound for the underlying HTTP client; per-call deadlines apply inside it
const HTTP_CLIENT_CEILING: Duration = Duration::from_secs(86_400);

/// Volley execution service client
///
/// # Example
///
/// ```no_run
/// use volley_sdk::VolleyClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = VolleyClient::connect("http://127.0.0.1:9611").await?;
/// let output = client.exec("uname -a", None).await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct VolleyClient {
    client: HttpClient,
    url: String,
    request_timeout: Duration,
}

impl VolleyClient {
    /// Connect to the execution service
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9611`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(HTTP_CLIENT_CEILING)
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Deadline for calls without an explicit command timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run a command line on the service host
    ///
    /// A non-zero exit or a killed process is a successful call. An error
    /// means the command could not be run or the service was unreachable.
    /// With a timeout the call waits that long plus a short grace period,
    /// otherwise it waits for the client's request timeout.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use volley_sdk::VolleyClient;
    /// # use std::time::Duration;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = VolleyClient::connect("http://127.0.0.1:9611").await?;
    /// let output = client.exec("sleep 5", Some(Duration::from_secs(1))).await?;
    /// assert!(output.exit_code.is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn exec(
        &self,
        command: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<ExecResponse> {
        let mut params = ObjectParams::new();
        params.insert("command", command.into())?;
        if let Some(timeout) = timeout {
            let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            params.insert("timeout_ms", millis)?;
        }

        let wait = call_deadline(timeout, self.request_timeout);
        match tokio::time::timeout(wait, self.client.request("exec.run.v1", params)).await {
            Ok(response) => Ok(response?),
            Err(_) => Err(SdkError::Timeout(format!(
                "no response within {}ms",
                wait.as_millis()
            ))),
        }
    }

    /// Service version and capacity
    pub async fn health(&self) -> Result<HealthResponse> {
        let call = self.client.request("system.health.v1", rpc_params![]);
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(response) => Ok(response?),
            Err(_) => Err(SdkError::Timeout("no health response".to_string())),
        }
    }
}

/// How long to wait for a reply to a command with the given timeout
fn call_deadline(timeout: Option<Duration>, fallback: Duration) -> Duration {
    match timeout {
        Some(timeout) => timeout.saturating_add(RESPONSE_GRACE),
        None => fallback,
    }
}

/// `CommandTransport` backed by a remote execution service
pub struct RemoteTransport {
    client: VolleyClient,
}

impl RemoteTransport {
    pub fn new(client: VolleyClient) -> Self {
        Self { client }
    }

    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::new(VolleyClient::connect(url).await?))
    }

    pub fn client(&self) -> &VolleyClient {
        &self.client
    }
}

#[async_trait]
impl CommandTransport for RemoteTransport {
    async fn execute(&self, command: &CommandString, timeout: Duration) -> ExecutionOutcome {
        debug!(url = %self.client.url, command = %command, "Forwarding command");

        let result = self.client.exec(command.as_str(), Some(timeout)).await;
        let outcome = outcome_from(result);
        if let Some(error) = &outcome.transport_error {
            warn!(url = %self.client.url, error = %error, "Remote execution failed");
        }
        outcome
    }
}

/// Map a service reply onto a transport outcome
///
/// - result: output as-is, no transport error
/// - call error with failure data: `transport_error = data.error` plus whatever
///   output the service captured
/// - anything else: `transport_error` only
pub fn outcome_from(result: Result<ExecResponse>) -> ExecutionOutcome {
    match result {
        Ok(resp) => ExecutionOutcome {
            stdout: resp.stdout,
            stderr: resp.stderr,
            exit_code: resp.exit_code,
            transport_error: None,
        },
        Err(SdkError::Rpc {
            code,
            message,
            data,
        }) => match data.and_then(|d| serde_json::from_value::<ExecFailureData>(d).ok()) {
            Some(data) => ExecutionOutcome {
                stdout: data.stdout.unwrap_or_default(),
                stderr: data.stderr.unwrap_or_default(),
                exit_code: data.exit_code,
                transport_error: Some(data.error),
            },
            None => ExecutionOutcome::transport_failure(&TransportError::Rpc { code, message }),
        },
        Err(e) => ExecutionOutcome::transport_failure(&TransportError::Connection(e.to_string())),
    }
}
