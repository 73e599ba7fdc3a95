//! Prompt analysis: split raw text into task segments and classify how many
//! distinct, (un)related asks it carries.
//!
//! Everything here is total over string input — there is no failure path.
//! Empty input parses to zero tasks and defaults to `Simple`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskKind, TaskWeight};

/// Overall classification of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptComplexity {
    /// A single atomic task or question.
    Simple,
    /// Multiple related tasks (same kind).
    Compound,
    /// Multiple unrelated tasks.
    Complex,
}

/// The result of analyzing one inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedPrompt {
    pub original_text: String,
    pub complexity: PromptComplexity,
    pub tasks: Vec<Task>,
    /// True when the text carries continuation cues ("continue", "earlier",
    /// "my previous", ...).
    pub requires_session_context: bool,
    /// Word count × 1.3, rounded.
    pub estimated_tokens: u32,
}

/// Segment separators, applied in order. Each pattern is run over every
/// segment accumulated so far; matches are removed and never merged back.
static SEPARATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:and then|then|also|additionally|furthermore)\b",
        r"(?i)(?:,\s*and\b|;\s*and\b|\.\s*and\b|\band\b)",
        r"(?i)\b(?:by the way|oh and|one more thing)\b",
        r"(?i)\.\s*(?:my name is|i'm|btw)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("separator pattern"))
    .collect()
});

/// Continuation cues that mean the reply depends on earlier conversation.
const CONTEXT_CUES: &[&str] = &[
    "continue",
    "also",
    "additionally",
    "furthermore",
    "my previous",
    "earlier",
    "before",
    "last time",
];

/// Urgency markers that pull a task's priority up one step.
const URGENT_WORDS: &[&str] = &["urgent", "important", "first", "priority"];

// Keyword tables for per-segment typing, tested in this order.
const CREATION_WORDS: &[&str] = &["implement", "create", "build", "make", "add", "save", "write"];
const EXPLANATION_WORDS: &[&str] = &["explain", "tell me", "how to", "describe"];
const SEARCH_WORDS: &[&str] = &["find", "search", "look for"];
const RECIPE_WORDS: &[&str] = &["recipe", "how to make", "cook"];
const CONTROL_WORDS: &[&str] = &["close", "end", "stop", "exit"];

/// Splits prompts into tasks and classifies their overall complexity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptParser;

impl PromptParser {
    pub fn new() -> Self {
        Self
    }

    /// Analyze one message. Never fails.
    pub fn parse(&self, text: &str) -> ParsedPrompt {
        let text = text.trim();

        let tasks = extract_tasks(text);
        let complexity = assess_complexity(&tasks);
        let requires_session_context = needs_session_context(text);
        let estimated_tokens =
            (text.split_whitespace().count() as f64 * 1.3).round() as u32;

        ParsedPrompt {
            original_text: text.to_string(),
            complexity,
            tasks,
            requires_session_context,
            estimated_tokens,
        }
    }
}

fn extract_tasks(text: &str) -> Vec<Task> {
    split_segments(text)
        .into_iter()
        .enumerate()
        .map(|(i, segment)| {
            let kind = identify_kind(&segment);
            let priority = task_priority(&segment, i);
            let weight = TaskWeight::from_text(&segment);
            Task {
                id: i + 1,
                text: segment,
                kind,
                priority,
                weight,
            }
        })
        .collect()
}

fn split_segments(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut segments = vec![text.to_string()];
    for pattern in SEPARATORS.iter() {
        let mut next = Vec::new();
        for segment in &segments {
            for part in pattern.split(segment) {
                next.push(part.to_string());
            }
        }
        segments = next;
    }

    segments
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn identify_kind(text: &str) -> TaskKind {
    let lower = text.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if contains_any(CREATION_WORDS) {
        TaskKind::Creation
    } else if contains_any(EXPLANATION_WORDS) {
        TaskKind::Explanation
    } else if contains_any(SEARCH_WORDS) {
        TaskKind::Search
    } else if contains_any(RECIPE_WORDS) {
        TaskKind::Recipe
    } else if contains_any(CONTROL_WORDS) {
        TaskKind::SessionControl
    } else {
        TaskKind::General
    }
}

fn assess_complexity(tasks: &[Task]) -> PromptComplexity {
    match tasks.len() {
        // Zero tasks (empty input) defaults to Simple.
        0 | 1 => PromptComplexity::Simple,
        2 => {
            if tasks[0].kind == tasks[1].kind {
                PromptComplexity::Compound
            } else {
                PromptComplexity::Complex
            }
        }
        _ => PromptComplexity::Complex,
    }
}

fn needs_session_context(text: &str) -> bool {
    let lower = text.to_lowercase();
    CONTEXT_CUES.iter().any(|cue| lower.contains(cue))
}

fn task_priority(text: &str, index: usize) -> usize {
    let base = index + 1;
    let lower = text.to_lowercase();
    if URGENT_WORDS.iter().any(|w| lower.contains(w)) {
        base.saturating_sub(1).max(1)
    } else {
        base
    }
}
