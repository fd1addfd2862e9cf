//! Daemon configuration from environment variables
//!
//! Read once at startup. Every key is optional.
//!
//! | Variable | Default |
//! |---|---|
//! | `VOLLEY_RPC_HOST` | `127.0.0.1` |
//! | `VOLLEY_RPC_PORT` | `9611` |
//! | `VOLLEY_SHELL` | `/bin/sh` |
//! | `VOLLEY_EXEC_TIMEOUT_MS` | `30000` |
//! | `VOLLEY_MAX_TIMEOUT_MS` | `300000` |
//! | `VOLLEY_MAX_CONCURRENT` | `16` |
//! | `VOLLEY_LOG_FORMAT` | `pretty` (`json`) |
//! | `VOLLEY_LOG_DIR` | unset (console only) |

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use volley_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use volley_api_rpc::{ExecLimits, RpcServerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub rpc_host: String,
    pub rpc_port: u16,
    /// Shell override; the platform shell when unset
    pub shell: Option<String>,
    pub limits: ExecLimits,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = ExecLimits::default();

        let default_timeout = parse_or(
            &get,
            "VOLLEY_EXEC_TIMEOUT_MS",
            millis(defaults.default_timeout),
        )?;
        let max_timeout =
            parse_or(&get, "VOLLEY_MAX_TIMEOUT_MS", millis(defaults.max_timeout))?;
        if default_timeout == 0 || max_timeout == 0 {
            bail!("VOLLEY_EXEC_TIMEOUT_MS and VOLLEY_MAX_TIMEOUT_MS must be positive");
        }
        if default_timeout > max_timeout {
            bail!(
                "VOLLEY_EXEC_TIMEOUT_MS ({}) exceeds VOLLEY_MAX_TIMEOUT_MS ({})",
                default_timeout,
                max_timeout
            );
        }

        let max_concurrent: usize =
            parse_or(&get, "VOLLEY_MAX_CONCURRENT", defaults.max_concurrent)?;
        if max_concurrent == 0 {
            bail!("VOLLEY_MAX_CONCURRENT must be at least 1");
        }

        let log_format = match get("VOLLEY_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => bail!(
                "Unknown VOLLEY_LOG_FORMAT '{}' (expected pretty or json)",
                other
            ),
        };

        Ok(Self {
            rpc_host: get("VOLLEY_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            rpc_port: parse_or(&get, "VOLLEY_RPC_PORT", DEFAULT_RPC_PORT)?,
            shell: get("VOLLEY_SHELL"),
            limits: ExecLimits {
                default_timeout: Duration::from_millis(default_timeout),
                max_timeout: Duration::from_millis(max_timeout),
                max_concurrent,
            },
            log_format,
            log_dir: get("VOLLEY_LOG_DIR")
                .map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned())),
        })
    }

    pub fn rpc_config(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
            limits: self.limits,
        }
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        None => Ok(default),
    }
}
