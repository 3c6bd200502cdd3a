//! Answer synthesis from shaped graph results.

pub mod prompts;

pub use prompts::{list_summary_prompt, pair_summary_prompt, render_pairs, render_value_list};

use crate::llm::LanguageModel;
use crate::shape::ShapedResult;
use crate::types::Result;

/// Answer when the graph returned no rows.
pub const NO_RESULT_ANSWER: &str = "No result found in the graph.";

/// Answer when the rows do not share a supported arity.
pub const UNSUPPORTED_ANSWER: &str = "Unsupported result format returned from the graph.";

/// Prefix of answers describing a failed query or summarization.
pub const ERROR_MARKER: &str = "Error running Cypher query:";

/// Summarizes shaped results with a language model.
pub struct AnswerSynthesizer<L> {
    llm: L,
}

impl<L: LanguageModel> AnswerSynthesizer<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Produce the answer for a shaped result.
    ///
    /// `Empty` and `Unsupported` results return their fixed answers without
    /// calling the model.
    ///
    /// # Errors
    ///
    /// Returns `LoreError::Llm` if the summarization call fails
    pub async fn synthesize(&self, question: &str, rows: &ShapedResult) -> Result<String> {
        let prompt = match rows {
            ShapedResult::Empty => return Ok(NO_RESULT_ANSWER.to_string()),
            ShapedResult::Unsupported => return Ok(UNSUPPORTED_ANSWER.to_string()),
            ShapedResult::OneColumn(values) => {
                list_summary_prompt(question, &render_value_list(values))
            }
            ShapedResult::TwoColumn(pairs) => pair_summary_prompt(question, &render_pairs(pairs)),
        };

        let answer = self.llm.complete(None, &prompt).await?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoreError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for Recorder {
        async fn complete(&self, system_prompt: Option<&str>, prompt: &str) -> Result<String> {
            assert!(system_prompt.is_none());
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("  The summary.\n".to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl LanguageModel for Failing {
        async fn complete(&self, _: Option<&str>, _: &str) -> Result<String> {
            Err(LoreError::llm("quota exceeded"))
        }
    }

    #[tokio::test]
    async fn test_one_column_prompt_and_trim() {
        let synth = AnswerSynthesizer::new(Recorder::default());
        let rows = ShapedResult::OneColumn(vec![
            "Chaos Blade".to_string(),
            "Moonlight Greatsword".to_string(),
        ]);

        let answer = synth.synthesize("What weapons are in Anor Londo?", &rows).await.unwrap();
        assert_eq!(answer, "The summary.");

        let prompts = synth.llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("What weapons are in Anor Londo?"));
        assert!(prompts[0].contains("Chaos Blade, and Moonlight Greatsword"));
    }

    #[tokio::test]
    async fn test_two_column_prompt() {
        let synth = AnswerSynthesizer::new(Recorder::default());
        let rows = ShapedResult::TwoColumn(vec![(json!("Chaos Blade"), json!("Quelaag"))]);

        synth.synthesize("Who wields the Chaos Blade?", &rows).await.unwrap();

        let prompts = synth.llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("- Chaos Blade → Quelaag"));
        assert!(prompts[0].contains("subject–object pairs"));
    }

    #[tokio::test]
    async fn test_sentinels_skip_llm() {
        let synth = AnswerSynthesizer::new(Recorder::default());

        let answer = synth.synthesize("q", &ShapedResult::Empty).await.unwrap();
        assert_eq!(answer, NO_RESULT_ANSWER);

        let answer = synth.synthesize("q", &ShapedResult::Unsupported).await.unwrap();
        assert_eq!(answer, UNSUPPORTED_ANSWER);

        assert!(synth.llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let synth = AnswerSynthesizer::new(Failing);
        let rows = ShapedResult::OneColumn(vec!["Pendant".to_string()]);
        assert!(synth.synthesize("q", &rows).await.is_err());
    }
}
