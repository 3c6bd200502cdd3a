//! Lore Graph QA - natural-language questions over a Dark Souls knowledge graph
//!
//! A question is turned into Cypher by a language model, the query is repaired
//! before it runs, and the rows are summarized back into prose:
//! - `query`: label stripping and `UNION` return canonicalization
//! - `shape`: raw rows into a tagged one/two-column result
//! - `synth`: result-specific summarization prompts
//! - `qa`: the end-to-end pipeline with injected clients
//!
//! ```rust,ignore
//! use lore_graph_qa::{Config, GraphQa};
//! use std::sync::Arc;
//!
//! let config = Config::load(None)?;
//! let qa = GraphQa::new(Arc::new(config.llm_client()?), config.graph_client()?, config.normalizer());
//! let result = qa.answer_question("What weapons are in Anor Londo?").await?;
//! println!("{}", result.answer);
//! ```

pub mod types;
pub mod query;
pub mod shape;
pub mod synth;
pub mod llm;
pub mod graph;
pub mod otel;
pub mod config;
pub mod qa;

pub use config::Config;
pub use graph::{GraphStore, Neo4jHttpClient};
pub use llm::{CypherGenerator, LanguageModel, LlmClient};
pub use qa::{GraphQa, QaAnswer};
pub use query::{normalize, NormalizeOrder, QueryNormalizer};
pub use shape::{shape, ShapedResult, ShapedRow};
pub use synth::{AnswerSynthesizer, ERROR_MARKER, NO_RESULT_ANSWER, UNSUPPORTED_ANSWER};
pub use types::{Category, LoreError, RawRow, Result};
