// Volley Infrastructure - System Adapters
// Implements: CommandTransport, ActionCatalog

pub mod shell_transport;
pub mod template_catalog;

pub use shell_transport::ShellTransport;
pub use template_catalog::TemplateCatalog;
