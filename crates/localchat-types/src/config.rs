//! Startup configuration for a chat session.
//!
//! `ChatConfig` is built once from CLI flags and environment variables and
//! then passed by reference to the provider and the session. It is never
//! mutated after startup.

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama3.2:1b";

/// Ollama's default listen address.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Number of user/assistant turns kept when none (or an invalid value) is configured.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Immutable configuration for one chat session.
///
/// Construct it with [`ChatConfig::from_raw`] (or [`Default`]), which
/// enforces a normalized endpoint, a positive turn limit and a non-blank
/// system prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Model identifier as known to the backend (e.g. "llama3.2:1b").
    pub model: String,

    /// Endpoint exactly as the user supplied it. Shown in the banner.
    pub raw_endpoint: String,

    /// Endpoint normalized to end with `/`, ready for path joins.
    pub endpoint: String,

    /// Optional system prompt seeded as the first history message.
    pub system_prompt: Option<String>,

    /// Maximum number of user/assistant turns retained in history.
    pub max_turns: usize,

    /// Sampling temperature forwarded to the backend, if set.
    pub temperature: Option<f64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::from_raw(None, None, None, None, None)
    }
}

impl ChatConfig {
    /// Build a configuration from raw inputs, applying defaults and normalization.
    ///
    /// - `endpoint` gains a trailing `/` if it lacks one
    /// - a blank `system_prompt` is treated as absent
    /// - `max_turns` falls back to [`DEFAULT_MAX_TURNS`] when missing,
    ///   unparseable, or not positive
    pub fn from_raw(
        model: Option<String>,
        endpoint: Option<String>,
        system_prompt: Option<String>,
        max_turns: Option<&str>,
        temperature: Option<f64>,
    ) -> Self {
        let raw_endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self {
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: normalize_endpoint(&raw_endpoint),
            raw_endpoint,
            system_prompt: system_prompt.filter(|s| !s.trim().is_empty()),
            max_turns: parse_max_turns(max_turns),
            temperature,
        }
    }
}

/// Ensure the endpoint ends with a path separator.
pub fn normalize_endpoint(raw: &str) -> String {
    if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    }
}

/// Parse the turn limit leniently.
///
/// Anything that is not a positive integer yields [`DEFAULT_MAX_TURNS`].
pub fn parse_max_turns(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_MAX_TURNS)
}
