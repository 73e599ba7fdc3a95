//! The per-user session record and its lifecycle states.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use parley_core::SessionId;

/// Default logical expiry threshold for a session.
pub const DEFAULT_TIMEOUT_MINUTES: i64 = 30;

/// Lifecycle state of a session.
///
/// A session reachable from the store's live map is never `Closed`; closing
/// removes it from the map in the same step that marks it `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Closing,
    Closed,
}

/// A logical conversation context tied to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Advances on every inbound message.
    pub last_activity: DateTime<Utc>,
    pub state: SessionState,
    /// Short-term memory: remembers the last classified task(s) for
    /// continuation. Cleared on close.
    pub context: HashMap<String, serde_json::Value>,
    pub message_count: u32,
    /// Per-session expiry threshold in minutes.
    pub timeout_minutes: i64,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: parley_core::types::new_session_id(),
            user_id: user_id.into(),
            created_at: now,
            last_activity: now,
            state: SessionState::Active,
            context: HashMap::new(),
            message_count: 0,
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
        }
    }

    /// Elapsed time since the last activity exceeds the timeout.
    pub fn is_expired(&self) -> bool {
        Utc::now() - self.last_activity > Duration::minutes(self.timeout_minutes)
    }

    /// Record inbound activity: bump the timestamp and the message counter.
    pub fn update_activity(&mut self) {
        self.last_activity = Utc::now();
        self.message_count += 1;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            state: self.state,
            created_at: self.created_at,
            last_activity: self.last_activity,
            message_count: self.message_count,
            timeout_minutes: self.timeout_minutes,
            is_expired: self.is_expired(),
            context_keys: self.context.keys().cloned().collect(),
        }
    }
}

/// Read-only view of a session for the operational query surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub user_id: String,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: u32,
    pub timeout_minutes: i64,
    pub is_expired: bool,
    pub context_keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_active_and_empty() {
        let session = Session::new("user-1");
        assert_eq!(session.state, SessionState::Active);
        assert_eq!(session.message_count, 0);
        assert!(session.context.is_empty());
        assert!(!session.is_expired());
    }

    #[test]
    fn activity_bumps_counter_and_timestamp() {
        let mut session = Session::new("user-1");
        let before = session.last_activity;
        session.update_activity();
        assert_eq!(session.message_count, 1);
        assert!(session.last_activity >= before);
    }

    #[test]
    fn backdated_activity_reports_expired() {
        let mut session = Session::new("user-1");
        session.last_activity = Utc::now() - Duration::minutes(31);
        assert!(session.is_expired());
    }
}
