//! Local degraded-mode responses, used when no remote tool client is wired.

use parley_routing::QueryKind;

/// Generates a local answer per tool family when the remote client is
/// unavailable. Honest about its limits rather than pretending.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(&self, kind: QueryKind, query: &str) -> String {
        match kind {
            QueryKind::StickyNotes => format!(
                "Noted locally: \"{query}\". The notes tool is offline, so this \
                 won't persist beyond the current process."
            ),
            QueryKind::DocSearch => format!(
                "Documentation search is offline. Try the official docs directly \
                 for: \"{query}\"."
            ),
            QueryKind::Math => format!(
                "The math tool is offline, so I can't evaluate \"{query}\" \
                 symbolically right now."
            ),
            QueryKind::GeneralChat => format!(
                "I'm running without my remote tools at the moment, but I heard \
                 you: \"{query}\"."
            ),
        }
    }
}
