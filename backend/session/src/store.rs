//! In-memory session store.
//!
//! A `Clone`-able handle over a shared map; every read-modify-write happens
//! under a single lock acquisition, and no lock is ever held across a call
//! into a collaborator. No operation here returns an error: absence is
//! `Option` or `bool`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use parley_core::SessionId;

use crate::session::{Session, SessionState, DEFAULT_TIMEOUT_MINUTES};

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    default_timeout_minutes: i64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_default_timeout(DEFAULT_TIMEOUT_MINUTES)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose new sessions expire after `minutes` of inactivity.
    pub fn with_default_timeout(minutes: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            default_timeout_minutes: minutes,
        }
    }

    /// Allocate a fresh session for `user_id` and return a copy of it.
    pub async fn create(&self, user_id: &str) -> Session {
        let mut session = Session::new(user_id);
        session.timeout_minutes = self.default_timeout_minutes;
        info!(
            session_id = %session.id,
            user_id = %user_id,
            "Created session"
        );
        let mut map = self.sessions.write().await;
        map.insert(session.id.clone(), session.clone());
        session
    }

    /// Pure lookup, no side effect.
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Run `f` against the live session under the write lock.
    /// Returns `None` if the session is not in the map.
    pub async fn with_session_mut<F, R>(&self, session_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut map = self.sessions.write().await;
        map.get_mut(session_id).map(f)
    }

    /// Record inbound activity and return the updated session.
    pub async fn touch(&self, session_id: &str) -> Option<Session> {
        self.with_session_mut(session_id, |session| {
            session.update_activity();
            session.clone()
        })
        .await
    }

    /// Store one context entry on the session.
    pub async fn remember(
        &self,
        session_id: &str,
        key: &str,
        value: serde_json::Value,
    ) -> bool {
        self.with_session_mut(session_id, |session| {
            session.context.insert(key.to_string(), value);
        })
        .await
        .is_some()
    }

    /// Close a session: clear its context, mark it `Closed`, and remove it
    /// from the live map in one step. Returns false if it was not found.
    pub async fn close(&self, session_id: &str, reason: &str) -> bool {
        let mut map = self.sessions.write().await;
        let Some(session) = map.get_mut(session_id) else {
            debug!(session_id = %session_id, "Close requested for unknown session");
            return false;
        };

        session.state = SessionState::Closing;
        session.context.clear();
        info!(
            session_id = %session_id,
            reason = %reason,
            messages = session.message_count,
            age_secs = (chrono::Utc::now() - session.created_at).num_seconds(),
            "Session closed"
        );
        session.state = SessionState::Closed;
        map.remove(session_id);
        true
    }

    /// Close every session owned by `user_id`; returns how many were closed.
    pub async fn close_user_sessions(&self, user_id: &str) -> usize {
        let candidates = self.user_sessions(user_id).await;
        let mut closed = 0;
        for session_id in candidates {
            if self.close(&session_id, "user_logout").await {
                closed += 1;
            }
        }
        closed
    }

    /// Evict every expired session; returns how many were closed.
    ///
    /// Candidate ids are snapshotted before closing so the map is never
    /// mutated while being iterated.
    pub async fn cleanup_expired(&self) -> usize {
        let expired: Vec<SessionId> = {
            let map = self.sessions.read().await;
            map.values()
                .filter(|s| s.is_expired())
                .map(|s| s.id.clone())
                .collect()
        };

        let mut closed = 0;
        for session_id in expired {
            if self.close(&session_id, "expired").await {
                closed += 1;
            }
        }
        closed
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Ids of every live session owned by `user_id`.
    pub async fn user_sessions(&self, user_id: &str) -> Vec<SessionId> {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.id.clone())
            .collect()
    }

    /// Read-only view of one session, if live.
    pub async fn snapshot(&self, session_id: &str) -> Option<crate::session::SessionSnapshot> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|s| s.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = SessionStore::new();
        let session = store.create("user-1").await;
        let fetched = store.get(&session.id).await.unwrap();
        assert_eq!(fetched.id, session.id);
        assert_eq!(fetched.message_count, 0);
        assert_eq!(fetched.state, SessionState::Active);
    }

    #[tokio::test]
    async fn configured_timeout_applies_to_new_sessions() {
        let store = SessionStore::with_default_timeout(5);
        let session = store.create("user-1").await;
        assert_eq!(session.timeout_minutes, 5);
    }

    #[tokio::test]
    async fn touch_advances_activity() {
        let store = SessionStore::new();
        let session = store.create("user-1").await;
        let touched = store.touch(&session.id).await.unwrap();
        assert_eq!(touched.message_count, 1);
        assert!(store.touch("no-such-session").await.is_none());
    }

    #[tokio::test]
    async fn close_twice_returns_true_then_false() {
        let store = SessionStore::new();
        let session = store.create("user-1").await;
        assert!(store.close(&session.id, "test").await);
        assert!(store.get(&session.id).await.is_none());
        assert!(!store.close(&session.id, "test").await);
    }

    #[tokio::test]
    async fn close_user_sessions_leaves_other_users_untouched() {
        let store = SessionStore::new();
        for _ in 0..3 {
            store.create("alice").await;
        }
        for _ in 0..2 {
            store.create("bob").await;
        }

        let closed = store.close_user_sessions("alice").await;
        assert_eq!(closed, 3);
        assert_eq!(store.count().await, 2);
        assert!(store.user_sessions("alice").await.is_empty());
        assert_eq!(store.user_sessions("bob").await.len(), 2);
    }

    #[tokio::test]
    async fn cleanup_removes_exactly_the_expired() {
        let store = SessionStore::new();
        let stale = store.create("user-1").await;
        let _fresh = store.create("user-1").await;

        store
            .with_session_mut(&stale.id, |s| {
                s.last_activity = Utc::now() - Duration::minutes(s.timeout_minutes + 1);
            })
            .await
            .unwrap();
        assert!(store.get(&stale.id).await.unwrap().is_expired());

        let before = store.count().await;
        let removed = store.cleanup_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(store.count().await, before - 1);
        assert!(store.get(&stale.id).await.is_none());
    }

    #[tokio::test]
    async fn remember_stores_context_until_close() {
        let store = SessionStore::new();
        let session = store.create("user-1").await;
        assert!(
            store
                .remember(&session.id, "last_prompt_type", serde_json::json!("simple"))
                .await
        );
        let snap = store.snapshot(&session.id).await.unwrap();
        assert_eq!(snap.context_keys, vec!["last_prompt_type".to_string()]);

        store.close(&session.id, "test").await;
        assert!(store.snapshot(&session.id).await.is_none());
    }
}
