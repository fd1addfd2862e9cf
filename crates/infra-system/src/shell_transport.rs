// Shell transport implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

use volley_core::domain::CommandString;
use volley_core::port::{CommandTransport, ExecutionOutcome, TimeProvider, TransportError};

#[cfg(unix)]
const DEFAULT_SHELL: &str = "/bin/sh";
#[cfg(windows)]
const DEFAULT_SHELL: &str = "cmd";

/// How long to wait for pipes to drain once the process group is killed
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Stand-in deadline for timeouts too large to add to the clock
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

type SharedBuf = Arc<Mutex<Vec<u8>>>;

/// Runs command lines through a local shell
///
/// Each call spawns `<shell> -c <command>` in its own process group with
/// stdout/stderr fully captured. On timeout the whole group is killed and
/// the output captured so far is returned with no exit code.
///
/// The command string gets full shell interpretation. Nothing is sandboxed.
pub struct ShellTransport {
    time_provider: Arc<dyn TimeProvider>,
    shell: String,
}

impl ShellTransport {
    /// Create a new shell transport using the platform shell
    ///
    /// # Example
    /// ```ignore
    /// let transport = ShellTransport::new(Arc::new(SystemTimeProvider))
    ///     .with_shell("/bin/bash");
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            shell: DEFAULT_SHELL.to_string(),
        }
    }

    /// Use another shell binary (must accept `-c <command>`)
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    fn build_command(&self, command: &CommandString) -> Command {
        let mut cmd = Command::new(&self.shell);

        #[cfg(unix)]
        {
            cmd.arg("-c");
            // Own process group so a timeout can take down grandchildren too
            cmd.process_group(0);
        }
        #[cfg(windows)]
        cmd.arg("/C");

        cmd.arg(command.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Spawn, wait with a deadline, and collect output
    async fn spawn_and_collect(
        &self,
        command: &CommandString,
        limit: Duration,
    ) -> Result<ExecutionOutcome, TransportError> {
        let deadline = deadline_after(limit);

        let mut child = self
            .build_command(command)
            .spawn()
            .map_err(|e| TransportError::SpawnFailed(format!("{}: {}", self.shell, e)))?;
        let pid = child.id();
        debug!(pid = ?pid, "Shell process spawned");

        let stdout_buf: SharedBuf = Arc::default();
        let stderr_buf: SharedBuf = Arc::default();
        let stdout_task = drain_into(child.stdout.take(), stdout_buf.clone())?;
        let stderr_task = drain_into(child.stderr.take(), stderr_buf.clone())?;
        let aborts = [stdout_task.abort_handle(), stderr_task.abort_handle()];

        // Polled across both waits below, never restarted
        let readers = async move {
            let _ = tokio::join!(stdout_task, stderr_task);
        };
        tokio::pin!(readers);

        let status = match timeout_at(deadline, child.wait()).await {
            Ok(Ok(status)) => Some(status),
            Ok(Err(e)) => return Err(TransportError::Io(e.to_string())),
            Err(_) => None,
        };

        // Pipes can outlive the shell when it left background jobs behind
        let drained = match status {
            Some(_) => timeout_at(deadline, &mut readers).await.is_ok(),
            None => false,
        };

        if !drained {
            warn!(
                pid = ?pid,
                timeout_ms = limit.as_millis() as u64,
                "Command exceeded its timeout, killing process group"
            );
            terminate(&mut child, pid).await;
            let _ = timeout(DRAIN_GRACE, &mut readers).await;
            for handle in &aborts {
                handle.abort();
            }
        }

        let stdout = take_lossy(&stdout_buf).await;
        let stderr = take_lossy(&stderr_buf).await;

        // A shell that exited keeps its exit code even if leftovers were killed
        match status.and_then(|s| s.code()) {
            Some(code) => Ok(ExecutionOutcome::exited(stdout, stderr, code)),
            None => Ok(ExecutionOutcome::killed(stdout, stderr)),
        }
    }
}

#[async_trait]
impl CommandTransport for ShellTransport {
    async fn execute(&self, command: &CommandString, timeout: Duration) -> ExecutionOutcome {
        let start_time = self.time_provider.now_millis();

        info!(
            shell = %self.shell,
            command = %command,
            timeout_ms = timeout.as_millis() as u64,
            "Starting shell execution"
        );

        let outcome = match self.spawn_and_collect(command, timeout).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Shell execution could not run");
                ExecutionOutcome::transport_failure(&e)
            }
        };

        let duration_ms = self.time_provider.now_millis() - start_time;
        info!(
            duration_ms = %duration_ms,
            exit_code = ?outcome.exit_code,
            killed = outcome.was_killed(),
            stdout_bytes = outcome.stdout.len(),
            stderr_bytes = outcome.stderr.len(),
            "Shell execution completed"
        );

        outcome
    }
}

fn drain_into<R>(pipe: Option<R>, sink: SharedBuf) -> Result<JoinHandle<()>, TransportError>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut pipe = pipe.ok_or_else(|| TransportError::Io("output pipe not captured".to_string()))?;
    Ok(tokio::spawn(async move {
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => sink.lock().await.extend_from_slice(&chunk[..n]),
                Err(e) => {
                    debug!(error = %e, "Output pipe closed with error");
                    break;
                }
            }
        }
    }))
}

/// `now + limit`, or a far-off deadline when that overflows
fn deadline_after(limit: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(limit).unwrap_or_else(|| now + FAR_FUTURE)
}

async fn take_lossy(buf: &SharedBuf) -> String {
    let bytes = std::mem::take(&mut *buf.lock().await);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// SIGKILL the whole process group, then reap the shell
async fn terminate(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!(pid = pid, error = %e, "killpg failed (group already gone?)");
        }
    }
    #[cfg(not(unix))]
    let _ = pid;

    if let Err(e) = child.start_kill() {
        debug!(error = %e, "start_kill failed (process already exited?)");
    }
    let _ = timeout(DRAIN_GRACE, child.wait()).await;
}
