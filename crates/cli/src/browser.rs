//! System browser navigator
//!
//! Hands URLs to the platform opener (`xdg-open`, `open`, `cmd /C start`).

use std::process::{Command, Stdio};
use volley_core::port::Navigator;

pub struct SystemBrowser;

impl SystemBrowser {
    fn opener(url: &str) -> Command {
        #[cfg(target_os = "macos")]
        let cmd = {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        };
        #[cfg(target_os = "windows")]
        let cmd = {
            let mut cmd = Command::new("cmd");
            // Empty title argument keeps `start` from eating a quoted URL
            cmd.args(["/C", "start", "", url]);
            cmd
        };
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let cmd = {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        };
        cmd
    }
}

impl Navigator for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), String> {
        let status = Self::opener(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("Could not launch the system browser: {}", e))?;

        if status.success() {
            Ok(())
        } else {
            Err(format!("Browser opener exited with {}", status))
        }
    }
}
