//! Language model access: completion trait, HTTP client and Cypher generation.

pub mod client;
pub mod cypher;

pub use client::{LlmClient, LlmProvider};
pub use cypher::{extract_cypher, CandidateQuery, CypherGenerator};

use crate::types::Result;
use async_trait::async_trait;

/// Text completion service: prompt in, text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt, optionally with a system prompt.
    ///
    /// # Errors
    ///
    /// Returns `LoreError::Llm` if the service fails or returns no text
    async fn complete(&self, system_prompt: Option<&str>, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for std::sync::Arc<T> {
    async fn complete(&self, system_prompt: Option<&str>, prompt: &str) -> Result<String> {
        (**self).complete(system_prompt, prompt).await
    }
}
