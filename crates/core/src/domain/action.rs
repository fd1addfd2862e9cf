// Action Domain Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Action ID (as authored in the template)
pub type ActionId = String;

/// HTTP method of a web action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Methods whose requests carry a body. Payloads are dropped for the rest.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a web action runs
///
/// Serialized names follow the template file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WebExecutionMode {
    /// Probe from the execution host with curl
    #[default]
    #[serde(rename = "server_curl", alias = "REMOTE_PROBE")]
    RemoteProbe,
    /// Open the URL in the operator's browser (GET only)
    #[serde(rename = "browser_ajax", alias = "LOCAL_OPEN")]
    LocalOpen,
}

impl std::fmt::Display for WebExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebExecutionMode::RemoteProbe => write!(f, "Server (cURL)"),
            WebExecutionMode::LocalOpen => write!(f, "Browser (open URL)"),
        }
    }
}

/// HTTP probe definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAction {
    pub method: HttpMethod,
    /// Absolute (`http(s)://...`) or relative to the default target URI
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub execution_mode: WebExecutionMode,
}

/// Shell script definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellAction {
    pub script: String,
}

/// What an action does. Closed set, matched exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionDetails {
    Web(WebAction),
    Shell(ShellAction),
}

impl ActionDetails {
    /// Short label for listings ("Web (POST)", "Shell Command")
    pub fn kind_label(&self) -> String {
        match self {
            ActionDetails::Web(web) => format!("Web ({})", web.method),
            ActionDetails::Shell(_) => "Shell Command".to_string(),
        }
    }
}

/// A named, user-defined unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackAction {
    pub id: ActionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub details: ActionDetails,
}

/// A named collection of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub actions: Vec<AttackAction>,
}

/// Attack scenario configuration (template / working set)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub version: String,
    pub attack_groups: Vec<AttackGroup>,
}

/// Operator settings that travel with a template
///
/// Credential fields found in older files are ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target_uri: Option<String>,
}
