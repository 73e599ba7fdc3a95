pub mod error;
pub mod message;
pub mod traits;
pub mod types;

pub use error::ParleyError;
pub use message::{ChatMessage, Role};
pub use traits::{ConversationLog, ToolClient};
pub use types::SessionId;
