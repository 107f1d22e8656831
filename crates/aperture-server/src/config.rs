//! Server configuration
//!
//! Values come from Shuttle secrets (or any key lookup); missing or
//! unparsable numbers fall back to defaults.

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Bearer key protecting `/api/agent/*`; `None` disables auth
    pub api_key: Option<String>,
    /// LLM key; `None` disables the agent endpoints
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    /// Stored messages loaded per turn
    pub history_limit: usize,
    /// History entries included in the prompt
    pub prompt_window: usize,
    /// Tool count above which a token-pressure warning is logged
    pub tool_warn_threshold: usize,
    /// Default row limit for `global_search`
    pub search_limit: usize,
    pub llm_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            history_limit: 50,
            prompt_window: 10,
            tool_warn_threshold: 12,
            search_limit: 10,
            llm_timeout: Duration::from_secs(60),
        }
    }
}

impl AgentConfig {
    /// Build the configuration from a key lookup such as `SecretStore::get`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_empty("APERTURE_API_KEY"),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            model: non_empty("APERTURE_MODEL").unwrap_or(defaults.model),
            history_limit: parse_or(&lookup, "APERTURE_HISTORY_LIMIT", defaults.history_limit),
            prompt_window: parse_or(&lookup, "APERTURE_PROMPT_WINDOW", defaults.prompt_window),
            tool_warn_threshold: parse_or(
                &lookup,
                "APERTURE_TOOL_WARN_THRESHOLD",
                defaults.tool_warn_threshold,
            ),
            search_limit: parse_or(&lookup, "APERTURE_SEARCH_LIMIT", defaults.search_limit),
            llm_timeout: Duration::from_secs(parse_or(
                &lookup,
                "APERTURE_LLM_TIMEOUT_SECS",
                defaults.llm_timeout.as_secs(),
            )),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("⚠️  Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AgentConfig::from_lookup(lookup_from(&[]));

        assert!(config.api_key.is_none());
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.prompt_window, 10);
        assert_eq!(config.tool_warn_threshold, 12);
        assert_eq!(config.llm_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AgentConfig::from_lookup(lookup_from(&[
            ("APERTURE_API_KEY", "secret"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
            ("APERTURE_MODEL", "gpt-4o"),
            ("APERTURE_PROMPT_WINDOW", "4"),
            ("APERTURE_LLM_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.prompt_window, 4);
        assert_eq!(config.llm_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_numbers_and_blank_keys_fall_back() {
        let config = AgentConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "   "),
            ("APERTURE_HISTORY_LIMIT", "lots"),
        ]));

        assert!(config.openai_api_key.is_none());
        assert_eq!(config.history_limit, 50);
    }
}
