//! Session control command detection over inbound message text.
//!
//! Checked by the chat coordinator before full prompt parsing; a match
//! short-circuits normal task classification.

/// Full control phrases that mark a message as a session command.
const SESSION_COMMANDS: &[&str] = &[
    "close session",
    "end session",
    "logout",
    "exit",
    "close chat",
    "end chat",
    "stop",
    "quit",
];

/// Close-family keywords within a recognized command.
const CLOSE_WORDS: &[&str] = &["close", "end", "logout", "exit", "quit"];

/// True iff the text contains one of the fixed control phrases.
pub fn is_session_command(text: &str) -> bool {
    let lower = text.to_lowercase();
    let lower = lower.trim();
    SESSION_COMMANDS.iter().any(|cmd| lower.contains(cmd))
}

/// True iff a recognized command asks to close the session.
pub fn is_close_command(text: &str) -> bool {
    let lower = text.to_lowercase();
    let lower = lower.trim();
    CLOSE_WORDS.iter().any(|word| lower.contains(word))
}
