use serde::{Deserialize, Serialize};

/// What kind of work a task segment asks for.
///
/// Assigned by testing fixed keyword sets in priority order; the first
/// matching category wins and `General` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Creation,
    Explanation,
    Search,
    Recipe,
    SessionControl,
    General,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Creation => "creation",
            TaskKind::Explanation => "explanation",
            TaskKind::Search => "search",
            TaskKind::Recipe => "recipe",
            TaskKind::SessionControl => "session_control",
            TaskKind::General => "general",
        }
    }
}

/// Rough effort estimate for a single task, by segment length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskWeight {
    Low,
    Medium,
    High,
}

impl TaskWeight {
    /// Length thresholds: <50 chars low, <150 medium, else high.
    pub fn from_text(text: &str) -> Self {
        match text.len() {
            0..=49 => TaskWeight::Low,
            50..=149 => TaskWeight::Medium,
            _ => TaskWeight::High,
        }
    }
}

/// One atomic unit of user intent extracted from a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// 1-based position among the extracted tasks.
    pub id: usize,
    /// The segment of the input text belonging to this task.
    pub text: String,
    pub kind: TaskKind,
    /// 1 = highest. Segment index + 1, pulled up one step (floored at 1)
    /// when the segment carries an urgency keyword.
    pub priority: usize,
    pub weight: TaskWeight,
}
