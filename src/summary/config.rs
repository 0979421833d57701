//! Summary provider configuration.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Configuration for the summary provider client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Whether summarization is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// OpenAI-compatible API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key for the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model to use for summarization
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Caller-side timeout for a single provider call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl SummaryConfig {
    /// Base default without env overrides (also keeps tests hermetic).
    pub fn base_default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SUMMARY_ENABLED`: "true" or "false"
    /// - `SUMMARY_ENDPOINT`: OpenAI-compatible API endpoint
    /// - `SUMMARY_API_KEY` (or `OPENAI_API_KEY`): provider API key
    /// - `SUMMARY_MODEL`: model name
    /// - `SUMMARY_MAX_TOKENS`: maximum tokens in response
    /// - `SUMMARY_TEMPERATURE`: generation temperature (0.0-1.0)
    /// - `SUMMARY_TIMEOUT_SECS`: per-call timeout
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("SUMMARY_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }
        if let Ok(val) = std::env::var("SUMMARY_ENDPOINT") {
            self.endpoint = val;
        }
        if let Ok(val) = std::env::var("SUMMARY_API_KEY") {
            self.api_key = Some(val);
        } else if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("SUMMARY_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("SUMMARY_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.max_tokens = n;
            }
        }
        if let Ok(val) = std::env::var("SUMMARY_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = t;
            }
        }
        if let Ok(val) = std::env::var("SUMMARY_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }
}
