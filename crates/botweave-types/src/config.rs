//! Global configuration types for Botweave.
//!
//! `GlobalConfig` represents the top-level `config.toml` controlling the
//! completion endpoint, model parameters, and usage defaults.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Botweave platform.
///
/// Loaded from `{data_dir}/config.toml`. All fields have sensible defaults.
/// The completion API key itself never lives here; it comes from the
/// `BOTWEAVE_API_KEY` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Completion endpoint URL (OpenAI-compatible chat completions).
    #[serde(default = "default_chat_endpoint")]
    pub chat_endpoint: String,

    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Completion token cap per turn.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Daily usage limit applied to bots created without an explicit one.
    #[serde(default = "default_usage_limit")]
    pub default_usage_limit: u32,

    /// Form-intake endpoint for the booking wizard. Booking submission is
    /// disabled when unset.
    #[serde(default)]
    pub form_endpoint: Option<String>,
}

fn default_chat_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    400
}

fn default_usage_limit() -> u32 {
    crate::bot::DEFAULT_USAGE_LIMIT
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            chat_endpoint: default_chat_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            default_usage_limit: default_usage_limit(),
            form_endpoint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 400);
        assert_eq!(config.default_usage_limit, 50);
        assert!(config.form_endpoint.is_none());
    }

    #[test]
    fn test_global_config_deserialize_empty_json_uses_defaults() {
        let config: GlobalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_global_config_deserialize_partial() {
        let config: GlobalConfig =
            serde_json::from_str(r#"{"model":"gpt-4o-mini","max_tokens":300}"#).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.default_usage_limit, 50);
    }
}
