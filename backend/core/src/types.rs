/// Opaque identifier for a conversation session.
///
/// Generated as a uuid-v4 string on creation; inbound callers may supply an
/// id they were handed earlier, or none at all.
pub type SessionId = String;

/// Mint a fresh session id.
pub fn new_session_id() -> SessionId {
    uuid::Uuid::new_v4().to_string()
}
