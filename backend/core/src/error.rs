use thiserror::Error;

/// Top-level error type for the Parley runtime.
///
/// Conditions that are expected in normal operation (a session lookup miss,
/// an unknown close target, an empty parse) are modelled as `Option`/`bool`
/// result values, not errors. Only collaborator-boundary failures and fatal
/// startup problems travel through this enum.
#[derive(Debug, Error)]
pub enum ParleyError {
    #[error("tool execution failed ({tool}): {message}")]
    Tool { tool: String, message: String },

    #[error("tool execution timed out ({tool}) after {timeout_secs}s")]
    ToolTimeout { tool: String, timeout_secs: u64 },

    #[error("conversation storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("session store could not resolve a session for user {user_id}")]
    SessionUnavailable { user_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
