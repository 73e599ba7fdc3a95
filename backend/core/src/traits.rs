use async_trait::async_trait;

use crate::error::ParleyError;
use crate::message::{ChatMessage, Role};
use crate::types::SessionId;

/// Append-only conversation history keyed by session id.
///
/// The backing technology (in-memory, relational, key-value) is a
/// collaborator concern; anything that satisfies append-then-read-in-order
/// works.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// Append one message to a session's history.
    async fn append(
        &self,
        session_id: &SessionId,
        role: Role,
        content: &str,
    ) -> Result<(), ParleyError>;

    /// The most recent `max_messages` entries, oldest first.
    async fn recent(
        &self,
        session_id: &SessionId,
        max_messages: usize,
    ) -> Result<Vec<ChatMessage>, ParleyError>;

    /// Drop a session's history entirely.
    async fn clear(&self, session_id: &SessionId) -> Result<(), ParleyError>;

    /// Ids of every session with recorded history.
    async fn session_ids(&self) -> Result<Vec<SessionId>, ParleyError>;
}

/// Remote tool-execution client.
///
/// Turns a resolved query into generated text, possibly by calling further
/// remote capabilities. Expected to suspend; the caller bounds it with a
/// timeout and propagates failures as [`ParleyError::Tool`] /
/// [`ParleyError::ToolTimeout`].
#[async_trait]
pub trait ToolClient: Send + Sync {
    /// Provider name used in logs and error messages.
    fn name(&self) -> &str;

    /// Execute `query` and return the generated text.
    async fn invoke(&self, query: &str) -> Result<String, ParleyError>;
}
