// Port Layer - Interfaces for external dependencies

pub mod action_catalog;
pub mod command_transport;
pub mod id_provider; // For deterministic testing
pub mod navigator;
pub mod time_provider;

// Re-exports
pub use action_catalog::ActionCatalog;
pub use command_transport::{CommandTransport, ExecutionOutcome, TransportError, DEFAULT_TIMEOUT};
pub use id_provider::IdProvider;
pub use navigator::Navigator;
pub use time_provider::TimeProvider;
