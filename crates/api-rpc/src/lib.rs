//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 execution service for Volley: a remote
//! client hands over a command line and gets back its raw output.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::{ExecLimits, RpcHandler};
pub use server::{RpcServer, RpcServerConfig};
