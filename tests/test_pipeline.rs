//! Pipeline tests against in-memory LLM and graph fakes.

use async_trait::async_trait;
use lore_graph_qa::{
    GraphQa, GraphStore, LanguageModel, LoreError, NormalizeOrder, QueryNormalizer, RawRow, Result,
    ERROR_MARKER, NO_RESULT_ANSWER, UNSUPPORTED_ANSWER,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replies with scripted completions in order, recording every prompt.
struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn complete(&self, _system_prompt: Option<&str>, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LoreError::llm("no scripted reply left")))
    }
}

/// Graph returning fixed rows (or a fixed failure), recording executed queries.
struct FakeGraph {
    rows: std::result::Result<Vec<RawRow>, String>,
    queries: Mutex<Vec<String>>,
}

impl FakeGraph {
    fn with_rows(rows: Vec<Vec<Value>>) -> Arc<Self> {
        let rows = rows
            .into_iter()
            .map(|values| {
                values
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (format!("c{}", i), v))
                    .collect()
            })
            .collect();
        Arc::new(Self {
            rows: Ok(rows),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            rows: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphStore for FakeGraph {
    async fn query(&self, cypher: &str) -> Result<Vec<RawRow>> {
        self.queries.lock().unwrap().push(cypher.to_string());
        self.rows.clone().map_err(LoreError::Graph)
    }
}

fn pipeline(
    llm: &Arc<ScriptedLlm>,
    graph: &Arc<FakeGraph>,
    order: NormalizeOrder,
) -> GraphQa<ScriptedLlm, Arc<FakeGraph>> {
    GraphQa::new(Arc::clone(llm), Arc::clone(graph), QueryNormalizer::new(order))
}

const WEAPONS_QUERY: &str =
    "MATCH (w:Weapon)-[:FOUND_IN]->(e:Entity {name: 'Anor Londo'}) RETURN w";

#[tokio::test]
async fn test_one_column_answer() {
    let llm = ScriptedLlm::new(vec![
        Ok(format!("```cypher\n{}\n```", WEAPONS_QUERY)),
        Ok("  Anor Londo holds the Chaos Blade and the Moonlight Greatsword.\n".to_string()),
    ]);
    let graph = FakeGraph::with_rows(vec![
        vec![json!({"name": "Chaos Blade", "damage": 144})],
        vec![json!({"name": "Moonlight Greatsword"})],
    ]);
    let qa = pipeline(&llm, &graph, NormalizeOrder::StripFirst);

    let result = qa.answer_question("What weapons are in Anor Londo?").await.unwrap();

    assert_eq!(result.raw_query, WEAPONS_QUERY);
    assert_eq!(
        result.answer,
        "Anor Londo holds the Chaos Blade and the Moonlight Greatsword."
    );
    assert_eq!(
        graph.queries(),
        vec!["MATCH (w)-[:FOUND_IN]->(e:Entity {name: 'Anor Londo'}) RETURN w".to_string()]
    );

    let prompts = llm.prompts();
    assert_eq!(prompts[0], "What weapons are in Anor Londo?");
    assert!(prompts[1].contains("Chaos Blade, and Moonlight Greatsword"));
}

#[tokio::test]
async fn test_two_column_answer() {
    let llm = ScriptedLlm::new(vec![
        Ok("MATCH (w)-[:WIELDED_BY]->(e) RETURN w, e".to_string()),
        Ok("Quelaag wields the Chaos Blade.".to_string()),
    ]);
    let graph = FakeGraph::with_rows(vec![vec![
        json!({"name": "Chaos Blade"}),
        json!({"name": "Quelaag"}),
    ]]);
    let qa = pipeline(&llm, &graph, NormalizeOrder::StripFirst);

    let result = qa.answer_question("Who wields the Chaos Blade?").await.unwrap();

    assert_eq!(result.answer, "Quelaag wields the Chaos Blade.");
    assert!(llm.prompts()[1].contains("- Chaos Blade → Quelaag"));
}

#[tokio::test]
async fn test_canonicalize_first_union_reaches_graph() {
    let union = "MATCH (s:Shield)-[:FOUND_IN]->(e:Entity {name: 'Anor Londo'}) RETURN s.name AS shield \
                 UNION MATCH (g:Gift)-[:FOUND_IN]->(e:Entity {name: 'Anor Londo'}) RETURN g.name AS gift";
    let llm = ScriptedLlm::new(vec![Ok(union.to_string()), Ok("Summary".to_string())]);
    let graph = FakeGraph::with_rows(vec![vec![json!("Crest Shield"), json!("Shield")]]);
    let qa = pipeline(&llm, &graph, NormalizeOrder::CanonicalizeFirst);

    qa.answer_question("What is in Anor Londo?").await.unwrap();

    let executed = &graph.queries()[0];
    assert!(executed.contains("MATCH (s)-[:FOUND_IN]"));
    assert!(executed.contains("RETURN s.name AS item, 'Shield' AS type"));
    assert!(executed.contains("RETURN g.name AS item, 'Gift' AS type"));
}

#[tokio::test]
async fn test_empty_result_skips_summary() {
    let llm = ScriptedLlm::new(vec![Ok("MATCH (n {name: 'Nobody'}) RETURN n".to_string())]);
    let graph = FakeGraph::with_rows(vec![]);
    let qa = pipeline(&llm, &graph, NormalizeOrder::StripFirst);

    let result = qa.answer_question("Who is Nobody?").await.unwrap();

    assert_eq!(result.answer, NO_RESULT_ANSWER);
    assert_eq!(llm.prompts().len(), 1);
}

#[tokio::test]
async fn test_mixed_arity_is_unsupported() {
    let llm = ScriptedLlm::new(vec![Ok("MATCH (n) RETURN n".to_string())]);
    let graph = FakeGraph::with_rows(vec![
        vec![json!("Pendant")],
        vec![json!("Pendant"), json!("Gift")],
    ]);
    let qa = pipeline(&llm, &graph, NormalizeOrder::StripFirst);

    let result = qa.answer_question("What is the Pendant?").await.unwrap();

    assert_eq!(result.answer, UNSUPPORTED_ANSWER);
    assert_eq!(llm.prompts().len(), 1);
}

#[tokio::test]
async fn test_graph_failure_is_returned_as_answer() {
    let llm = ScriptedLlm::new(vec![Ok("MATCH (n) RETURN n".to_string())]);
    let graph = FakeGraph::failing("connection refused");
    let qa = pipeline(&llm, &graph, NormalizeOrder::StripFirst);

    let result = qa.answer_question("Anything?").await.unwrap();

    assert!(result.answer.starts_with(ERROR_MARKER));
    assert!(result.answer.contains("connection refused"));
    assert_eq!(result.raw_query, "MATCH (n) RETURN n");
}

#[tokio::test]
async fn test_summary_failure_is_returned_as_answer() {
    let llm = ScriptedLlm::new(vec![
        Ok("MATCH (n) RETURN n".to_string()),
        Err(LoreError::llm("rate limited")),
    ]);
    let graph = FakeGraph::with_rows(vec![vec![json!({"name": "Pendant"})]]);
    let qa = pipeline(&llm, &graph, NormalizeOrder::StripFirst);

    let result = qa.answer_question("What is the Pendant?").await.unwrap();

    assert!(result.answer.starts_with(ERROR_MARKER));
    assert!(result.answer.contains("rate limited"));
}

#[tokio::test]
async fn test_generation_failure_propagates() {
    let llm = ScriptedLlm::new(vec![Err(LoreError::llm("unauthorized"))]);
    let graph = FakeGraph::with_rows(vec![]);
    let qa = pipeline(&llm, &graph, NormalizeOrder::StripFirst);

    let err = qa.answer_question("Who is Gwyn?").await.unwrap_err();

    assert!(matches!(err, LoreError::Llm(_)));
    assert!(graph.queries().is_empty());
}

#[tokio::test]
async fn test_answer_serializes_as_pair() {
    let llm = ScriptedLlm::new(vec![]);
    let graph = FakeGraph::with_rows(vec![]);
    let qa = pipeline(&llm, &graph, NormalizeOrder::StripFirst);

    let result = qa.answer_candidate("q", "MATCH (n) RETURN n".to_string()).await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"raw_query": "MATCH (n) RETURN n", "answer": NO_RESULT_ANSWER})
    );
}
