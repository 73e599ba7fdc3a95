pub mod log;

pub use log::InMemoryConversationLog;
