//! Summary provider client.
//!
//! Wraps a hosted text-generation model behind an OpenAI-compatible
//! chat-completions API. The client carries a bounded token budget and a
//! caller-side timeout; callers treat every failure as a soft failure and
//! fall back rather than propagate.

mod config;
pub mod prompts;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use config::SummaryConfig;
pub use prompts::{FALLBACK_SUMMARY, NO_REVIEWS_SUMMARY};

use crate::models::{Entity, Review};

/// Errors that can occur during a provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("no API key configured")]
    MissingApiKey,
    #[error("summarization is disabled")]
    Disabled,
}

/// Chat-completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completions response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for the summary provider.
pub struct SummaryClient {
    config: SummaryConfig,
    client: Client,
}

impl SummaryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SummaryConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Generate a short natural-language summary of an entity's reviews.
    pub async fn summarize(
        &self,
        entity: &Entity,
        reviews: &[Review],
    ) -> Result<String, ProviderError> {
        if !self.config.enabled {
            return Err(ProviderError::Disabled);
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey)?;

        let prompt = prompts::render_summary_prompt(entity, reviews);
        debug!(entity_id = %entity.id, review_count = reviews.len(), "requesting summary");

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: prompts::SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user", content: prompt },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!("{}/v1/chat/completions", self.config.endpoint);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("HTTP {}: {}", status, body)));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let summary = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if summary.is_empty() {
            return Err(ProviderError::Parse("empty summary response".to_string()));
        }

        info!(entity_id = %entity.id, summary_length = summary.len(), "summary generated");
        Ok(summary)
    }
}
