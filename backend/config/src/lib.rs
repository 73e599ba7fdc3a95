//! Runtime settings, resolved from `PARLEY_*` environment variables at
//! startup with sensible defaults.
//!
//! Per-request conditions are never config errors; the one fatal case is
//! enabling remote tools without an API key, which aborts startup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use parley_core::ParleyError;

/// Default session expiry threshold (minutes).
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Default reaper sweep interval (seconds).
pub const DEFAULT_REAP_INTERVAL_SECS: u64 = 300;

/// Default bound on one remote tool invocation (seconds).
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub session_timeout_minutes: i64,
    pub reap_interval_secs: u64,
    pub tool_timeout_secs: u64,
    /// When true, a tool API key must be present.
    pub remote_tools_enabled: bool,
    #[serde(skip_serializing)]
    pub tool_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_timeout_minutes: DEFAULT_SESSION_TIMEOUT_MINUTES,
            reap_interval_secs: DEFAULT_REAP_INTERVAL_SECS,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            remote_tools_enabled: false,
            tool_api_key: None,
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self, ParleyError> {
        Self::from_env_map(&std::env::vars().collect())
    }

    /// Resolve settings from a provided map (useful for testing).
    pub fn from_env_map(env: &HashMap<String, String>) -> Result<Self, ParleyError> {
        let settings = Self {
            session_timeout_minutes: parse_var(
                env,
                "PARLEY_SESSION_TIMEOUT_MINUTES",
                DEFAULT_SESSION_TIMEOUT_MINUTES,
            )?,
            reap_interval_secs: parse_var(
                env,
                "PARLEY_REAP_INTERVAL_SECS",
                DEFAULT_REAP_INTERVAL_SECS,
            )?,
            tool_timeout_secs: parse_var(
                env,
                "PARLEY_TOOL_TIMEOUT_SECS",
                DEFAULT_TOOL_TIMEOUT_SECS,
            )?,
            remote_tools_enabled: env
                .get("PARLEY_REMOTE_TOOLS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
            tool_api_key: env
                .get("PARLEY_TOOL_API_KEY")
                .filter(|v| !v.is_empty())
                .cloned(),
        };

        if settings.remote_tools_enabled && settings.tool_api_key.is_none() {
            return Err(ParleyError::Config(
                "PARLEY_REMOTE_TOOLS is enabled but PARLEY_TOOL_API_KEY is not set".to_string(),
            ));
        }

        info!(
            session_timeout_minutes = settings.session_timeout_minutes,
            reap_interval_secs = settings.reap_interval_secs,
            remote_tools = settings.remote_tools_enabled,
            "Settings resolved"
        );
        Ok(settings)
    }
}

fn parse_var<T: std::str::FromStr>(
    env: &HashMap<String, String>,
    name: &str,
    default: T,
) -> Result<T, ParleyError> {
    match env.get(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ParleyError::Config(format!("invalid value for {name}: {raw:?}"))),
        None => Ok(default),
    }
}
