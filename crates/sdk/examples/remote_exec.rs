//! Remote Execution Example
//!
//! Runs one command on a Volley daemon and prints the raw output.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package volley-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package volley-sdk --example remote_exec -- "uname -a"
//!    ```

use std::time::Duration;
use volley_sdk::VolleyClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let command = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "echo hello from volley".to_string());

    let client = VolleyClient::connect("http://127.0.0.1:9611").await?;

    let health = client.health().await?;
    println!(
        "Connected to volley {} ({} of {} slots free)",
        health.version, health.available_permits, health.max_concurrent
    );

    let output = client.exec(command, Some(Duration::from_secs(10))).await?;
    println!("exit code: {:?}", output.exit_code);
    println!("--- stdout ---\n{}", output.stdout);
    println!("--- stderr ---\n{}", output.stderr);

    Ok(())
}
