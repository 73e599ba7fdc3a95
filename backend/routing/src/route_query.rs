//! Map a resolved query to the tool family that should answer it.
//!
//! Conversation is the default: a tool is only chosen when the user asks for
//! it with an explicit phrase. Total over all string input.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The tool family a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    GeneralChat,
    StickyNotes,
    DocSearch,
    Math,
}

impl QueryKind {
    /// Wire name of the tool that serves this family.
    pub fn tool_name(&self) -> &'static str {
        match self {
            QueryKind::GeneralChat => "general_chat",
            QueryKind::StickyNotes => "sticky_notes",
            QueryKind::DocSearch => "docs_search",
            QueryKind::Math => "math",
        }
    }
}

/// Where a query was routed and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub kind: QueryKind,
    pub tool_name: String,
    pub confidence: f32,
    pub reasoning: String,
}

impl RoutingDecision {
    fn new(kind: QueryKind, confidence: f32, reasoning: impl Into<String>) -> Self {
        Self {
            kind,
            tool_name: kind.tool_name().to_string(),
            confidence,
            reasoning: reasoning.into(),
        }
    }
}

const NOTE_PHRASES: &[&str] = &[
    "save note",
    "add note",
    "add a note",
    "create note",
    "create a note",
    "list notes",
    "search notes",
    "note down",
];

const DOC_PHRASES: &[&str] = &[
    "search docs",
    "search the docs",
    "find documentation",
    "search documentation",
    "lookup api",
    "api reference",
];

const MATH_PHRASES: &[&str] = &[
    "calculate derivative",
    "calculate the derivative",
    "derivative of",
    "find integral",
    "integral of",
    "solve equation",
];

/// Phrase-list router. Only explicit tool requests leave general chat.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRouter;

impl KeywordRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn route(&self, query: &str) -> RoutingDecision {
        let lower = query.to_lowercase();
        // Parameter is `&'static` so the matched phrase can outlive the call.
        let hit = |phrases: &[&'static str]| phrases.iter().find(|p| lower.contains(*p)).copied();

        let decision = if let Some(phrase) = hit(NOTE_PHRASES) {
            RoutingDecision::new(
                QueryKind::StickyNotes,
                0.9,
                format!("matched note action \"{phrase}\""),
            )
        } else if let Some(phrase) = hit(DOC_PHRASES) {
            RoutingDecision::new(
                QueryKind::DocSearch,
                0.9,
                format!("matched doc search \"{phrase}\""),
            )
        } else if let Some(phrase) = hit(MATH_PHRASES) {
            RoutingDecision::new(
                QueryKind::Math,
                0.9,
                format!("matched math operation \"{phrase}\""),
            )
        } else {
            RoutingDecision::new(
                QueryKind::GeneralChat,
                0.9,
                "no explicit tool request, treating as conversation",
            )
        };

        debug!(tool = %decision.tool_name, "Routed query");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_note_request_routes_to_notes() {
        let decision = KeywordRouter::new().route("Add a note about the standup");
        assert_eq!(decision.kind, QueryKind::StickyNotes);
        assert_eq!(decision.tool_name, "sticky_notes");
    }

    #[test]
    fn doc_and_math_requests_route_to_their_tools() {
        let router = KeywordRouter::new();
        assert_eq!(router.route("search docs for tokio select").kind, QueryKind::DocSearch);
        assert_eq!(router.route("derivative of x^2").kind, QueryKind::Math);
    }

    #[test]
    fn reasoning_names_the_matched_phrase() {
        let decision = KeywordRouter::new().route("please save note for tomorrow");
        assert_eq!(decision.kind, QueryKind::StickyNotes);
        assert!(decision.reasoning.contains("save note"));
    }

    #[test]
    fn conversation_is_the_default() {
        let decision = KeywordRouter::new().route("how was your day");
        assert_eq!(decision.kind, QueryKind::GeneralChat);
    }
}
