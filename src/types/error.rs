//! Error types for graph question answering.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` implementations.

use thiserror::Error;

/// Error type for every stage of the question-answering pipeline.
///
/// Generation errors are surfaced to the caller; graph and summarization
/// errors are folded into the answer text by [`crate::qa::GraphQa`].
#[derive(Error, Debug)]
pub enum LoreError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Language model request failed
    #[error("LLM request failed: {0}")]
    Llm(String),

    /// Query generation produced no usable Cypher
    #[error("Query generation failed: {0}")]
    Generation(String),

    /// Graph query execution failed
    #[error("Graph query failed: {0}")]
    Graph(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LoreError {
    /// Create a graph error with context.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }

    /// Create an LLM error with context.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a configuration error with context.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LoreError>;
