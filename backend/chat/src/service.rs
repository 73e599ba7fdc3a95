//! Front-door glue: record the inbound message, coordinate the session,
//! execute the resolved task(s), record the reply.
//!
//! This is the only place where the chat path touches the conversation log
//! and the tool layer; the coordinator itself stays free of collaborator
//! I/O. Failures from those collaborators are the only errors that escape
//! to the caller.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use parley_config::Settings;
use parley_core::{ConversationLog, ParleyError, Role, ToolClient};
use parley_session::{SessionReaper, SessionStore};
use parley_tools::ToolDispatch;

use crate::coordinator::ChatCoordinator;
use crate::envelope::{ChatOutcome, Reply};

/// The outcome plus the generated answer text.
#[derive(Debug, Clone)]
pub struct ServiceReply {
    pub outcome: ChatOutcome,
    pub text: String,
}

pub struct ChatService {
    coordinator: ChatCoordinator,
    log: Arc<dyn ConversationLog>,
    dispatch: Arc<ToolDispatch>,
}

impl ChatService {
    pub fn new(
        coordinator: ChatCoordinator,
        log: Arc<dyn ConversationLog>,
        dispatch: Arc<ToolDispatch>,
    ) -> Self {
        Self {
            coordinator,
            log,
            dispatch,
        }
    }

    /// Wire the whole stack from resolved settings: store, reaper,
    /// coordinator, and tool dispatch. The conversation log and the
    /// optional remote tool client stay caller-provided.
    pub fn from_settings(
        settings: &Settings,
        log: Arc<dyn ConversationLog>,
        client: Option<Arc<dyn ToolClient>>,
    ) -> Self {
        let store = SessionStore::with_default_timeout(settings.session_timeout_minutes);
        let reaper = Arc::new(SessionReaper::new(
            store.clone(),
            Duration::from_secs(settings.reap_interval_secs),
        ));
        let dispatch = Arc::new(ToolDispatch::new(
            client,
            Duration::from_secs(settings.tool_timeout_secs),
        ));
        Self::new(ChatCoordinator::new(store, reaper), log, dispatch)
    }

    /// Process-level bootstrap: structured logging into `log_dir`, then a
    /// service wired from `PARLEY_*` environment settings. Fails only on a
    /// fatal configuration error.
    pub fn from_env(
        log_dir: impl AsRef<Path>,
        log: Arc<dyn ConversationLog>,
        client: Option<Arc<dyn ToolClient>>,
    ) -> Result<Self, ParleyError> {
        parley_logging::init_logger(log_dir, "info");
        let settings = Settings::from_env()?;
        Ok(Self::from_settings(&settings, log, client))
    }

    pub fn coordinator(&self) -> &ChatCoordinator {
        &self.coordinator
    }

    /// Full round trip for one message.
    ///
    /// Control commands bypass the log and the tool layer entirely. For
    /// everything else the strategy decides execution order: compound tasks
    /// run sequentially as extracted, complex tasks run in the priority
    /// order the coordinator already applied.
    pub async fn converse(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<ServiceReply, ParleyError> {
        let outcome = self.coordinator.handle(user_id, session_id, message).await?;

        let queries: Vec<String> = match &outcome.reply {
            Reply::SessionClosed { message, .. } | Reply::UnknownCommand { message } => {
                let text = message.clone();
                return Ok(ServiceReply { text, outcome });
            }
            Reply::SimpleResponse { task, .. } => match task {
                Some(task) => vec![task.text.clone()],
                None => Vec::new(),
            },
            Reply::CompoundResponse { tasks, .. } | Reply::ComplexResponse { tasks, .. } => {
                tasks.iter().map(|t| t.text.clone()).collect()
            }
        };

        self.log
            .append(&outcome.session_id, Role::User, message)
            .await?;

        let mut answers = Vec::with_capacity(queries.len());
        for query in &queries {
            let (_, answer) = self.dispatch.execute(query).await?;
            answers.push(answer);
        }
        let text = if answers.is_empty() {
            "I didn't find anything to act on in that message.".to_string()
        } else {
            answers.join("\n\n")
        };

        self.log
            .append(&outcome.session_id, Role::Assistant, &text)
            .await?;
        info!(
            session_id = %outcome.session_id,
            tasks = queries.len(),
            "Conversation turn complete"
        );

        Ok(ServiceReply { outcome, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_memory::InMemoryConversationLog;
    use parley_session::{SessionReaper, SessionStore};
    use std::time::Duration;

    fn service() -> (ChatService, InMemoryConversationLog) {
        let store = SessionStore::new();
        let reaper = Arc::new(SessionReaper::new(store.clone(), Duration::from_secs(300)));
        let coordinator = ChatCoordinator::new(store, reaper);
        let log = InMemoryConversationLog::new();
        let service = ChatService::new(
            coordinator,
            Arc::new(log.clone()),
            Arc::new(ToolDispatch::local_only()),
        );
        (service, log)
    }

    #[tokio::test]
    async fn turn_records_user_and_assistant_messages() {
        let (service, log) = service();

        let reply = service
            .converse("alice", None, "add a note about the retro")
            .await
            .unwrap();

        assert!(reply.text.contains("retro"));
        let history = log.recent(&reply.outcome.session_id, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(matches!(history[0].role, Role::User));
        assert!(matches!(history[1].role, Role::Assistant));
        service.coordinator().shutdown().await;
    }

    #[tokio::test]
    async fn multi_task_turn_answers_each_task() {
        let (service, _) = service();

        let reply = service
            .converse(
                "alice",
                None,
                "add a note about rust and also search docs for tokio",
            )
            .await
            .unwrap();

        // Two tasks, two answers joined into one reply.
        assert_eq!(reply.text.matches("\n\n").count(), 1);
        service.coordinator().shutdown().await;
    }

    #[tokio::test]
    async fn env_bootstrap_serves_a_conversation() {
        let dir = std::env::temp_dir().join("parley-chat-bootstrap");
        let service =
            ChatService::from_env(&dir, Arc::new(InMemoryConversationLog::new()), None).unwrap();

        let reply = service.converse("alice", None, "hello there").await.unwrap();
        assert!(!reply.text.is_empty());
        service.coordinator().shutdown().await;
    }

    #[tokio::test]
    async fn from_settings_applies_configured_session_timeout() {
        let settings = parley_config::Settings {
            session_timeout_minutes: 5,
            ..parley_config::Settings::default()
        };
        let service = ChatService::from_settings(
            &settings,
            Arc::new(InMemoryConversationLog::new()),
            None,
        );

        let reply = service.converse("alice", None, "hello there").await.unwrap();
        let snapshot = service
            .coordinator()
            .session_info(&reply.outcome.session_id)
            .await
            .unwrap();
        assert_eq!(snapshot.timeout_minutes, 5);
        service.coordinator().shutdown().await;
    }

    #[tokio::test]
    async fn control_command_skips_log_and_tools() {
        let (service, log) = service();

        let reply = service
            .converse("alice", Some("missing"), "close session")
            .await
            .unwrap();

        assert!(matches!(
            reply.outcome.reply,
            Reply::SessionClosed { closed: false, .. }
        ));
        assert!(log.session_ids().await.unwrap().is_empty());
        service.coordinator().shutdown().await;
    }
}
