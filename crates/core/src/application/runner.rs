// Action Runner - one execution from definition to record

use crate::application::parser::ResultParser;
use crate::application::synthesizer::{synthesize, validate};
use crate::domain::{ActionDetails, CommandString, Dispatch, ExecutionRecord};
use crate::error::{CoreError, Result};
use crate::port::{CommandTransport, IdProvider, Navigator, TimeProvider, DEFAULT_TIMEOUT};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Runs actions: validate, synthesize, dispatch, parse
///
/// Stateless between calls, so one runner can serve concurrent executions.
/// Nothing is retried; a failed run is reported as-is.
pub struct ActionRunner {
    transport: Arc<dyn CommandTransport>,
    navigator: Arc<dyn Navigator>,
    parser: ResultParser,
    timeout: Duration,
}

impl ActionRunner {
    pub fn new(
        transport: Arc<dyn CommandTransport>,
        navigator: Arc<dyn Navigator>,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            transport,
            navigator,
            parser: ResultParser::new(time_provider, id_provider),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the transport timeout (default 30s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate and synthesize without executing (dry run)
    ///
    /// # Errors
    /// - CoreError::Precondition if a required field is empty
    pub fn prepare(&self, details: &ActionDetails, default_base: Option<&str>) -> Result<Dispatch> {
        validate(details)?;
        Ok(synthesize(details, default_base))
    }

    /// Execute an action and return its record
    ///
    /// # Errors
    /// Only precondition violations. Every execution failure (command or
    /// transport) is captured in the returned record.
    pub async fn run(
        &self,
        details: &ActionDetails,
        default_base: Option<&str>,
    ) -> Result<ExecutionRecord> {
        let dispatch = self.prepare(details, default_base)?;
        Ok(self.run_dispatch(dispatch).await)
    }

    /// Execute an operator-supplied command line verbatim
    ///
    /// # Errors
    /// - CoreError::Precondition if the command is blank
    pub async fn run_command(&self, command: CommandString) -> Result<ExecutionRecord> {
        if command.is_empty() {
            return Err(CoreError::Precondition(
                "Command must be a non-empty string".to_string(),
            ));
        }
        Ok(self
            .run_dispatch(Dispatch::Transport {
                command,
                web_probe: false,
            })
            .await)
    }

    /// Execute an already synthesized dispatch
    pub async fn run_dispatch(&self, dispatch: Dispatch) -> ExecutionRecord {
        let warning = dispatch.navigation_warning();
        match dispatch {
            Dispatch::Transport { command, web_probe } => {
                info!(
                    command = %command,
                    web_probe = web_probe,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Dispatching command"
                );

                let outcome = self.transport.execute(&command, self.timeout).await;
                let record = self.parser.parse(outcome, web_probe, command.as_str());

                info!(
                    record_id = %record.id(),
                    exit_code = ?record.exit_code(),
                    classification = %record.classification(),
                    http_status = ?record.http_status().map(|s| s.code),
                    "Execution finished"
                );
                record
            }
            Dispatch::Navigate { url, method } => {
                if let Some(w) = &warning {
                    warn!(url = %url, method = %method, "{}", w);
                }
                info!(url = %url, "Opening URL through navigator");
                let result = self.navigator.open(&url);
                self.parser.navigation(&url, result, warning)
            }
        }
    }
}
