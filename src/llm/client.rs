//! HTTP client for chat-completion APIs.

use crate::llm::LanguageModel;
use crate::otel::llm_span;
use crate::types::{LoreError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::Instrument;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI Chat Completions, or any compatible endpoint
    OpenAI,
    Anthropic,
}

impl LlmProvider {
    /// Pick the provider from the model name.
    pub fn for_model(model: &str) -> Self {
        if model.starts_with("claude") || model.starts_with("anthropic") {
            Self::Anthropic
        } else {
            Self::OpenAI
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAI => OPENAI_BASE_URL,
            Self::Anthropic => ANTHROPIC_BASE_URL,
        }
    }
}

/// Chat-completion client used for both query generation and summarization.
pub struct LlmClient {
    api_key: String,
    model: String,
    provider: LlmProvider,
    base_url: String,
    client: Client,
}

/// OpenAI API response.
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

/// Anthropic API response.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

impl LlmClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for the provider
    /// * `model` - Model name (e.g., "gpt-4o", "claude-3-5-sonnet-20241022")
    ///
    /// # Returns
    ///
    /// New `LlmClient` pointed at the provider's public endpoint
    pub fn new(api_key: String, model: String) -> Self {
        let provider = LlmProvider::for_model(&model);
        Self {
            api_key,
            model,
            provider,
            base_url: provider.default_base_url().to_string(),
            client: Client::new(),
        }
    }

    /// Override the API base URL (OpenAI-compatible gateways, local servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Call OpenAI-compatible API.
    async fn call_openai(&self, system_prompt: Option<&str>, user_prompt: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": user_prompt}));

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "temperature": 0
            }))
            .send()
            .await
            .map_err(|e| LoreError::llm(format!("OpenAI API error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LoreError::llm(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LoreError::llm(format!("OpenAI API error {}: {}", status, body)));
        }

        let parsed: OpenAIResponse = serde_json::from_str(&body)
            .map_err(|e| LoreError::llm(format!("Failed to parse OpenAI response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LoreError::llm("No response from OpenAI"))
    }

    /// Call Anthropic API.
    async fn call_anthropic(&self, system_prompt: Option<&str>, user_prompt: &str) -> Result<String> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": 4096,
            "messages": [
                {"role": "user", "content": user_prompt}
            ],
            "temperature": 0
        });
        if let Some(system) = system_prompt {
            body["system"] = json!(system);
        }

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| LoreError::llm(format!("Anthropic API error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LoreError::llm(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LoreError::llm(format!("Anthropic API error {}: {}", status, body)));
        }

        let parsed: AnthropicResponse = serde_json::from_str(&body).map_err(|e| {
            LoreError::llm(format!("Failed to parse Anthropic response: {}\nBody: {}", e, body))
        })?;

        parsed
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| LoreError::llm("No response from Anthropic"))
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn complete(&self, system_prompt: Option<&str>, prompt: &str) -> Result<String> {
        let span = llm_span(&self.model, if system_prompt.is_some() { "chat" } else { "completion" });
        async {
            let text = match self.provider {
                LlmProvider::OpenAI => self.call_openai(system_prompt, prompt).await?,
                LlmProvider::Anthropic => self.call_anthropic(system_prompt, prompt).await?,
            };
            tracing::debug!(chars = text.len(), "LLM completion received");
            Ok::<_, LoreError>(text)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_for_model() {
        assert_eq!(LlmProvider::for_model("gpt-4o"), LlmProvider::OpenAI);
        assert_eq!(LlmProvider::for_model("claude-3-5-sonnet-20241022"), LlmProvider::Anthropic);
        assert_eq!(LlmProvider::for_model("llama3"), LlmProvider::OpenAI);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = LlmClient::new("k".to_string(), "gpt-4o".to_string())
            .with_base_url("http://localhost:11434/v1/");
        assert_eq!(client.base_url, "http://localhost:11434/v1");
        assert_eq!(client.provider(), LlmProvider::OpenAI);
    }
}
