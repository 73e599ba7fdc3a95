//! Simple in-memory conversation log.
//!
//! Satisfies the append-then-read-in-order contract; good enough for a
//! single process and for tests. A durable backend can replace it behind
//! the same trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use parley_core::{ChatMessage, ConversationLog, ParleyError, Role, SessionId};

#[derive(Default, Clone)]
pub struct InMemoryConversationLog {
    conversations: Arc<RwLock<HashMap<SessionId, Vec<ChatMessage>>>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn append(
        &self,
        session_id: &SessionId,
        role: Role,
        content: &str,
    ) -> Result<(), ParleyError> {
        let mut map = self.conversations.write().await;
        map.entry(session_id.clone())
            .or_default()
            .push(ChatMessage::new(role, content));
        Ok(())
    }

    async fn recent(
        &self,
        session_id: &SessionId,
        max_messages: usize,
    ) -> Result<Vec<ChatMessage>, ParleyError> {
        let map = self.conversations.read().await;
        let messages = match map.get(session_id) {
            Some(messages) => {
                let skip = messages.len().saturating_sub(max_messages);
                messages[skip..].to_vec()
            }
            None => Vec::new(),
        };
        Ok(messages)
    }

    async fn clear(&self, session_id: &SessionId) -> Result<(), ParleyError> {
        self.conversations.write().await.remove(session_id);
        Ok(())
    }

    async fn session_ids(&self) -> Result<Vec<SessionId>, ParleyError> {
        Ok(self.conversations.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_read_preserves_order() {
        let log = InMemoryConversationLog::new();
        let sid: SessionId = "s1".to_string();

        log.append(&sid, Role::User, "first").await.unwrap();
        log.append(&sid, Role::Assistant, "second").await.unwrap();
        log.append(&sid, Role::User, "third").await.unwrap();

        let messages = log.recent(&sid, 10).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn recent_returns_only_the_tail() {
        let log = InMemoryConversationLog::new();
        let sid: SessionId = "s1".to_string();
        for i in 0..5 {
            log.append(&sid, Role::User, &format!("m{i}")).await.unwrap();
        }

        let tail = log.recent(&sid, 2).await.unwrap();
        let contents: Vec<&str> = tail.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);
    }

    #[tokio::test]
    async fn clear_drops_the_session_history() {
        let log = InMemoryConversationLog::new();
        let sid: SessionId = "s1".to_string();
        log.append(&sid, Role::User, "hello").await.unwrap();

        log.clear(&sid).await.unwrap();
        assert!(log.recent(&sid, 10).await.unwrap().is_empty());
        assert!(log.session_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_session_reads_empty() {
        let log = InMemoryConversationLog::new();
        let messages = log.recent(&"nope".to_string(), 3).await.unwrap();
        assert!(messages.is_empty());
    }
}
