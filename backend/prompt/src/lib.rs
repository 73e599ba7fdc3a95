pub mod commands;
pub mod parser;
pub mod task;

pub use commands::{is_close_command, is_session_command};
pub use parser::{ParsedPrompt, PromptComplexity, PromptParser};
pub use task::{Task, TaskKind, TaskWeight};
