// Template catalog implementation
// reason: serde_json for the template file, std::fs since loading happens once at startup
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use volley_core::domain::{AppConfig, AttackGroup, UserSettings};
use volley_core::port::ActionCatalog;
use volley_core::{CoreError, Result};

const INVALID_TEMPLATE: &str =
    "Invalid attack template file format. Expected version and attackGroups.";

/// Attack groups loaded from a JSON template file
///
/// Accepted shape (camelCase):
/// ```json
/// {
///   "version": "1.0",
///   "attackGroups": [ ... ],
///   "userSettings": { "defaultTargetUri": "http://target.test" }
/// }
/// ```
/// A top-level `defaultTargetUri` is accepted as well and wins over the
/// one in `userSettings`.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    config: AppConfig,
    settings: UserSettings,
}

impl TemplateCatalog {
    pub fn new(config: AppConfig, settings: UserSettings) -> Self {
        Self { config, settings }
    }

    /// Read and validate a template file
    ///
    /// # Errors
    /// - CoreError::Io if the file cannot be read
    /// - CoreError::Config if the content is not a valid template
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&text)?;

        info!(
            path = %path.display(),
            version = %catalog.config.version,
            groups = catalog.config.attack_groups.len(),
            actions = catalog.action_count(),
            "Attack template loaded"
        );
        Ok(catalog)
    }

    /// Parse template text
    ///
    /// # Errors
    /// - CoreError::Config if `version` is not a string, `attackGroups` is not
    ///   an array, or a group/action does not match the action schema
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CoreError::Config(format!("{} ({})", INVALID_TEMPLATE, e)))?;

        let well_formed = value.get("version").map_or(false, Value::is_string)
            && value.get("attackGroups").map_or(false, Value::is_array);
        if !well_formed {
            return Err(CoreError::Config(INVALID_TEMPLATE.to_string()));
        }

        let mut settings: UserSettings = match value.get("userSettings") {
            Some(raw) => serde_json::from_value(raw.clone())
                .map_err(|e| CoreError::Config(format!("Invalid userSettings: {}", e)))?,
            None => UserSettings::default(),
        };
        if let Some(uri) = value.get("defaultTargetUri").and_then(Value::as_str) {
            settings.default_target_uri = Some(uri.to_string());
        }

        let config: AppConfig = serde_json::from_value(value)
            .map_err(|e| CoreError::Config(format!("Invalid attack group definition: {}", e)))?;

        debug!(version = %config.version, "Template parsed");
        Ok(Self { config, settings })
    }

    /// Override the template's default target (e.g. from the command line)
    pub fn with_default_target_uri(mut self, uri: Option<String>) -> Self {
        if let Some(uri) = uri.filter(|u| !u.trim().is_empty()) {
            self.settings.default_target_uri = Some(uri);
        }
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn action_count(&self) -> usize {
        self.config.attack_groups.iter().map(|g| g.actions.len()).sum()
    }
}

impl ActionCatalog for TemplateCatalog {
    fn groups(&self) -> &[AttackGroup] {
        &self.config.attack_groups
    }

    fn default_target_uri(&self) -> Option<&str> {
        self.settings
            .default_target_uri
            .as_deref()
            .filter(|u| !u.is_empty())
    }
}
