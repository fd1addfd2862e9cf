// Command Domain Model

use super::action::HttpMethod;
use serde::{Deserialize, Serialize};

/// A fully escaped shell command line.
///
/// Built once by the synthesizer and handed to a transport as-is. It is never
/// re-parsed or re-escaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandString(String);

impl CommandString {
    pub(crate) fn synthesized(line: String) -> Self {
        Self(line)
    }

    /// Wrap a command line typed by the operator (no escaping is applied)
    pub fn raw(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for CommandString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the synthesizer decided to do with an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Run a command through the execution transport
    Transport {
        command: CommandString,
        /// Stdout carries the HTTP status marker
        web_probe: bool,
    },
    /// Open the resolved URL through the presentation layer's navigator
    Navigate { url: String, method: HttpMethod },
}

impl Dispatch {
    /// Warning for navigations that cannot honour the configured method
    pub fn navigation_warning(&self) -> Option<String> {
        match self {
            Dispatch::Navigate { method, .. } if *method != HttpMethod::Get => Some(format!(
                "The specified method is {}. Opening a URL in a new tab results in a GET request; \
                 headers and payload are not sent.",
                method
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_warning_only_for_non_get() {
        let get = Dispatch::Navigate {
            url: "http://x.test/".to_string(),
            method: HttpMethod::Get,
        };
        assert!(get.navigation_warning().is_none());

        let post = Dispatch::Navigate {
            url: "http://x.test/".to_string(),
            method: HttpMethod::Post,
        };
        let warning = post.navigation_warning().unwrap();
        assert!(warning.contains("POST"));

        let transport = Dispatch::Transport {
            command: CommandString::raw("true"),
            web_probe: false,
        };
        assert!(transport.navigation_warning().is_none());
    }

    #[test]
    fn test_raw_command_emptiness() {
        assert!(CommandString::raw("   ").is_empty());
        assert!(!CommandString::raw("id").is_empty());
    }
}
