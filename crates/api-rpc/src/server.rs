//! JSON-RPC Server
//!
//! Serves the execution methods over HTTP on a TCP socket.

use crate::handler::{ExecLimits, RpcHandler};
use crate::types::ExecRequest;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use volley_core::port::CommandTransport;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9611;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port (see [`RpcServer::start`])
    pub port: u16,
    pub limits: ExecLimits,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            limits: ExecLimits::default(),
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, transport: Arc<dyn CommandTransport>) -> Self {
        let handler = Arc::new(RpcHandler::new(transport, config.limits));
        Self { config, handler }
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the handle and the bound address. Anything that reaches this
    /// port can run commands on the host, so keep it on loopback unless the
    /// network is trusted.
    pub async fn start(self) -> Result<(ServerHandle, SocketAddr), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            max_concurrent = self.config.limits.max_concurrent,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("exec.run.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ExecRequest = params.parse()?;
                    handler.exec(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("system.health.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.health().await }
            })
            .map_err(|e| e.to_string())?;

        info!(addr = %local_addr, "JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok((handle, local_addr))
    }
}
