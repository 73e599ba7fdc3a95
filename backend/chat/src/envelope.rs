//! Typed reply envelopes.
//!
//! One variant per response kind, each carrying only the fields relevant to
//! that kind; consumers match on the enum instead of branching on a type
//! string.

use serde::{Deserialize, Serialize};

use parley_core::SessionId;
use parley_prompt::{PromptComplexity, Task};

/// How the resolved task(s) should be handled downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Single task, answer directly.
    DirectResponse,
    /// Related tasks, handle in original order.
    SequentialHandling,
    /// Unrelated tasks, handle in priority order.
    PrioritizedHandling,
}

/// The dispatch result for one inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    SimpleResponse {
        /// Absent only for degenerate (empty) input.
        task: Option<Task>,
        strategy: Strategy,
        message: String,
    },
    CompoundResponse {
        tasks: Vec<Task>,
        strategy: Strategy,
        message: String,
        note: String,
    },
    ComplexResponse {
        /// Sorted by priority ascending; ties keep original order.
        tasks: Vec<Task>,
        strategy: Strategy,
        message: String,
        recommendation: String,
    },
    SessionClosed {
        message: String,
        closed: bool,
    },
    UnknownCommand {
        message: String,
    },
}

/// Prompt-analysis metadata carried alongside the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDigest {
    pub complexity: PromptComplexity,
    pub task_count: usize,
    pub requires_context: bool,
    pub estimated_tokens: u32,
}

/// Session metadata carried alongside the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub message_count: u32,
    pub session_age_secs: i64,
}

/// Everything the coordinator returns for one message.
///
/// `session_id` is whichever id now identifies the live session — it may
/// differ from the caller-supplied one when none existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub session_id: SessionId,
    pub user_id: String,
    pub reply: Reply,
    pub analysis: Option<PromptDigest>,
    pub session: Option<SessionSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_serializes_with_type_tag() {
        let reply = Reply::SessionClosed {
            message: "Session closed successfully".to_string(),
            closed: true,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "session_closed");
        assert_eq!(json["closed"], true);

        let reply = Reply::UnknownCommand {
            message: "Unknown session command".to_string(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "unknown_command");
    }

    #[test]
    fn strategy_names_are_snake_case() {
        let json = serde_json::to_value(Strategy::SequentialHandling).unwrap();
        assert_eq!(json, "sequential_handling");
    }
}
