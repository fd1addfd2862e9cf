// Domain Layer - Pure business logic and entities

pub mod action;
pub mod command;
pub mod record;

// Re-exports
pub use action::{
    ActionDetails, ActionId, AppConfig, AttackAction, AttackGroup, HttpMethod, ShellAction,
    UserSettings, WebAction, WebExecutionMode,
};
pub use command::{CommandString, Dispatch};
pub use record::{Classification, ExecutionRecord, HttpStatus, RecordId};
