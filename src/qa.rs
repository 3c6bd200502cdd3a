//! Question answering pipeline.
//!
//! question → Cypher generation → normalization → graph execution → shaping →
//! summarization.

use crate::graph::GraphStore;
use crate::llm::{CypherGenerator, LanguageModel};
use crate::query::QueryNormalizer;
use crate::shape::shape;
use crate::synth::{AnswerSynthesizer, ERROR_MARKER};
use crate::types::{LoreError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;

/// Answer paired with the query it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaAnswer {
    /// Generated query before normalization
    pub raw_query: String,
    pub answer: String,
}

/// Question-answering pipeline over injected LLM and graph clients.
pub struct GraphQa<L: ?Sized, G> {
    generator: CypherGenerator<Arc<L>>,
    synthesizer: AnswerSynthesizer<Arc<L>>,
    normalizer: QueryNormalizer,
    graph: G,
}

impl<L, G> GraphQa<L, G>
where
    L: LanguageModel + ?Sized,
    G: GraphStore,
{
    /// Create a pipeline.
    ///
    /// # Arguments
    ///
    /// * `llm` - Model used for both query generation and summarization
    /// * `graph` - Graph the normalized queries run against
    /// * `normalizer` - Query normalizer
    pub fn new(llm: Arc<L>, graph: G, normalizer: QueryNormalizer) -> Self {
        Self {
            generator: CypherGenerator::new(Arc::clone(&llm)),
            synthesizer: AnswerSynthesizer::new(llm),
            normalizer,
            graph,
        }
    }

    pub fn normalizer(&self) -> &QueryNormalizer {
        &self.normalizer
    }

    /// Answer a natural-language question.
    ///
    /// # Errors
    ///
    /// Only query generation errors are returned. Failures while executing the
    /// query or summarizing its rows are reported in [`QaAnswer::answer`]
    /// with the `Error running Cypher query:` prefix.
    pub async fn answer_question(&self, question: &str) -> Result<QaAnswer> {
        let span = tracing::info_span!("qa.answer", question = %question);
        async {
            let candidate = self.generator.generate(question).await?;
            Ok::<_, LoreError>(self.answer_candidate(question, candidate.query).await)
        }
        .instrument(span)
        .await
    }

    /// Normalize, execute and summarize an already generated query.
    pub async fn answer_candidate(&self, question: &str, raw_query: String) -> QaAnswer {
        let answer = match self.execute_and_summarize(question, &raw_query).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, query = %raw_query, "Answering failed");
                format!("{} {}", ERROR_MARKER, e)
            }
        };

        QaAnswer { raw_query, answer }
    }

    async fn execute_and_summarize(&self, question: &str, raw_query: &str) -> Result<String> {
        let normalized = self.normalizer.normalize(raw_query);
        let rows = self.graph.query(&normalized).await?;
        let shaped = shape(&rows);
        tracing::info!(rows = rows.len(), shaped = shaped.len(), "Graph query completed");
        self.synthesizer.synthesize(question, &shaped).await
    }
}
