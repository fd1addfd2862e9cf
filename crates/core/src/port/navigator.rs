// Navigator Port
// Browser-side navigation is owned by the presentation layer, never by the core

/// Capability to open a URL for the operator (e.g. a new browser tab)
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Open `url`. The error string is shown to the operator as-is.
    fn open(&self, url: &str) -> Result<(), String>;
}

/// Navigator for headless contexts (daemon, tests): always refuses
pub struct NoNavigator;

impl Navigator for NoNavigator {
    fn open(&self, _url: &str) -> Result<(), String> {
        Err("No browser is available in this context".to_string())
    }
}
