// Application Layer - Use Cases and Business Logic

pub mod parser;
pub mod runner;
pub mod status;
pub mod synthesizer;
pub mod target;

// Re-exports
pub use parser::ResultParser;
pub use runner::ActionRunner;
pub use status::{reason_phrase, reason_phrase_str};
pub use synthesizer::{curl_command, shell_command, synthesize, validate, STATUS_MARKER};
pub use target::{encode_uri, resolve_target};
