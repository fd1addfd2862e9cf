//! Volley Daemon - Main Entry Point
//! Execution service: runs command lines handed over JSON-RPC

mod config;
mod telemetry;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

// Import workspace crates
use config::DaemonConfig;
use volley_api_rpc::RpcServer;
use volley_core::port::time_provider::SystemTimeProvider;
use volley_infra_system::ShellTransport;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env().context("Invalid daemon configuration")?;

    // 2. Initialize logging
    let _log_guard = telemetry::init_logging(&config)?;

    info!(
        version = VERSION,
        core_version = volley_core::VERSION,
        "Volley daemon starting..."
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let mut transport = ShellTransport::new(time_provider);
    if let Some(shell) = &config.shell {
        transport = transport.with_shell(shell.clone());
    }
    info!(
        shell = %transport.shell(),
        default_timeout_ms = config.limits.default_timeout.as_millis() as u64,
        max_timeout_ms = config.limits.max_timeout.as_millis() as u64,
        max_concurrent = config.limits.max_concurrent,
        "Shell transport ready"
    );

    if config.rpc_host != volley_api_rpc::server::DEFAULT_RPC_HOST {
        warn!(
            host = %config.rpc_host,
            "Binding beyond loopback: anyone who can reach this port can run commands on this host"
        );
    }

    // 4. Start JSON-RPC server
    let rpc_server = RpcServer::new(config.rpc_config(), Arc::new(transport));
    let (rpc_handle, addr) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Waiting for commands...");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
