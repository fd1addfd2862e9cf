//! Volley SDK - Rust Client Library
//!
//! Client for the Volley execution service, plus [`RemoteTransport`], which
//! plugs the service into the core as a `CommandTransport`.
//!
//! # Example
//!
//! ```no_run
//! use volley_sdk::VolleyClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VolleyClient::connect("http://127.0.0.1:9611").await?;
//!
//!     let output = client.exec("id", None).await?;
//!     println!("exit={:?} stdout={}", output.exit_code, output.stdout);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{outcome_from, RemoteTransport, VolleyClient, DEFAULT_REQUEST_TIMEOUT};
pub use error::{Result, SdkError};
pub use types::{ExecFailureData, ExecResponse, HealthResponse};
