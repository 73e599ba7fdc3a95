//! The chat coordinator: resolves a session for each inbound message,
//! triages the prompt, and dispatches by complexity.
//!
//! All dependencies are explicit constructor arguments; nothing here is a
//! process-wide singleton. The handle path performs no I/O beyond the
//! session store's in-memory map — persistence and tool execution belong to
//! the collaborators behind `ChatService`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use parley_core::{ParleyError, SessionId};
use parley_prompt::{
    is_close_command, is_session_command, ParsedPrompt, PromptComplexity, PromptParser, Task,
};
use parley_session::{Session, SessionReaper, SessionSnapshot, SessionStore};

use crate::envelope::{ChatOutcome, PromptDigest, Reply, SessionSummary, Strategy};

pub struct ChatCoordinator {
    store: SessionStore,
    reaper: Arc<SessionReaper>,
    parser: PromptParser,
}

impl ChatCoordinator {
    pub fn new(store: SessionStore, reaper: Arc<SessionReaper>) -> Self {
        Self {
            store,
            reaper,
            parser: PromptParser::new(),
        }
    }

    /// Handle one inbound message.
    ///
    /// Session-control commands short-circuit before any session is created;
    /// otherwise the session is fetched or created, touched, and the parsed
    /// prompt is dispatched by complexity. The returned outcome carries the
    /// id that now identifies the live session.
    pub async fn handle(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<ChatOutcome, ParleyError> {
        // Lazy idempotent init; the reaper loop is shared process-wide.
        self.reaper.start().await;

        if is_session_command(message) {
            return Ok(self.handle_session_command(user_id, session_id, message).await);
        }

        let session = self.resolve_session(user_id, session_id).await?;
        let parsed = self.parser.parse(message);
        debug!(
            session_id = %session.id,
            complexity = ?parsed.complexity,
            tasks = parsed.tasks.len(),
            "Parsed prompt"
        );

        let reply = self.dispatch(&session.id, &parsed).await;

        Ok(ChatOutcome {
            session_id: session.id.clone(),
            user_id: user_id.to_string(),
            reply,
            analysis: Some(PromptDigest {
                complexity: parsed.complexity,
                task_count: parsed.tasks.len(),
                requires_context: parsed.requires_session_context,
                estimated_tokens: parsed.estimated_tokens,
            }),
            session: Some(SessionSummary {
                message_count: session.message_count,
                session_age_secs: (Utc::now() - session.created_at).num_seconds(),
            }),
        })
    }

    async fn handle_session_command(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        message: &str,
    ) -> ChatOutcome {
        if is_close_command(message) {
            let closed = match session_id {
                Some(id) => self.store.close(id, "user_command").await,
                None => false,
            };
            info!(user_id = %user_id, closed, "Session close command");
            return ChatOutcome {
                session_id: session_id.unwrap_or_default().to_string(),
                user_id: user_id.to_string(),
                reply: Reply::SessionClosed {
                    message: if closed {
                        "Session closed successfully".to_string()
                    } else {
                        "Session not found".to_string()
                    },
                    closed,
                },
                analysis: Some(PromptDigest {
                    complexity: PromptComplexity::Simple,
                    task_count: 1,
                    requires_context: false,
                    estimated_tokens: 0,
                }),
                session: None,
            };
        }

        ChatOutcome {
            session_id: session_id.unwrap_or_default().to_string(),
            user_id: user_id.to_string(),
            reply: Reply::UnknownCommand {
                message: "Unknown session command".to_string(),
            },
            analysis: None,
            session: None,
        }
    }

    /// Fetch-or-create, then record activity. A session closed out from
    /// under us between resolve and touch is treated as not-found and
    /// recreated; only a store that cannot produce a touchable session at
    /// all is fatal.
    async fn resolve_session(
        &self,
        user_id: &str,
        session_id: Option<&str>,
    ) -> Result<Session, ParleyError> {
        let existing = match session_id {
            Some(id) => self.store.get(id).await,
            None => None,
        };
        let session = match existing {
            Some(session) => session,
            None => self.store.create(user_id).await,
        };

        if let Some(touched) = self.store.touch(&session.id).await {
            return Ok(touched);
        }

        // Reaped or closed concurrently; recreate rather than crash.
        let fresh = self.store.create(user_id).await;
        self.store
            .touch(&fresh.id)
            .await
            .ok_or_else(|| ParleyError::SessionUnavailable {
                user_id: user_id.to_string(),
            })
    }

    async fn dispatch(&self, session_id: &SessionId, parsed: &ParsedPrompt) -> Reply {
        match parsed.complexity {
            PromptComplexity::Simple => self.dispatch_simple(session_id, parsed).await,
            PromptComplexity::Compound => self.dispatch_compound(session_id, parsed).await,
            PromptComplexity::Complex => self.dispatch_complex(session_id, parsed).await,
        }
    }

    async fn dispatch_simple(&self, session_id: &SessionId, parsed: &ParsedPrompt) -> Reply {
        let Some(task) = parsed.tasks.first() else {
            return Reply::SimpleResponse {
                task: None,
                strategy: Strategy::DirectResponse,
                message: "Nothing to do: the message contained no task".to_string(),
            };
        };

        self.store
            .remember(session_id, "last_task", to_context_value(task))
            .await;
        self.store
            .remember(session_id, "last_prompt_type", "simple".into())
            .await;

        Reply::SimpleResponse {
            task: Some(task.clone()),
            strategy: Strategy::DirectResponse,
            message: format!(
                "Processing {} task: {}",
                task.kind.as_str(),
                preview(&task.text)
            ),
        }
    }

    async fn dispatch_compound(&self, session_id: &SessionId, parsed: &ParsedPrompt) -> Reply {
        self.store
            .remember(session_id, "last_tasks", to_context_value(&parsed.tasks))
            .await;
        self.store
            .remember(session_id, "last_prompt_type", "compound".into())
            .await;

        Reply::CompoundResponse {
            tasks: parsed.tasks.clone(),
            strategy: Strategy::SequentialHandling,
            message: format!(
                "Processing {} related tasks sequentially",
                parsed.tasks.len()
            ),
            note: "Handling related tasks in original order".to_string(),
        }
    }

    async fn dispatch_complex(&self, session_id: &SessionId, parsed: &ParsedPrompt) -> Reply {
        let sorted = prioritized(&parsed.tasks);

        self.store
            .remember(session_id, "last_tasks", to_context_value(&sorted))
            .await;
        self.store
            .remember(session_id, "last_prompt_type", "complex".into())
            .await;

        Reply::ComplexResponse {
            message: format!("Processing {} different tasks", sorted.len()),
            tasks: sorted,
            strategy: Strategy::PrioritizedHandling,
            recommendation:
                "Complex request detected; consider splitting unrelated asks into separate messages"
                    .to_string(),
        }
    }

    // --- operational query surface -------------------------------------

    pub async fn session_info(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.store.snapshot(session_id).await
    }

    pub async fn active_sessions(&self) -> usize {
        self.store.count().await
    }

    pub async fn close_session(&self, session_id: &str) -> bool {
        self.store.close(session_id, "operator").await
    }

    pub async fn close_user_sessions(&self, user_id: &str) -> usize {
        self.store.close_user_sessions(user_id).await
    }

    pub async fn cleanup_now(&self) -> usize {
        self.store.cleanup_expired().await
    }

    /// Stop the background reaper; the store itself needs no teardown.
    pub async fn shutdown(&self) {
        self.reaper.stop().await;
    }
}

/// Stable sort by priority ascending; ties keep original relative order.
pub fn prioritized(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|t| t.priority);
    sorted
}

fn to_context_value<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

fn preview(text: &str) -> String {
    if text.chars().count() <= 50 {
        text.to_string()
    } else {
        let head: String = text.chars().take(50).collect();
        format!("{head}...")
    }
}
