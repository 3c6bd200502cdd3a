//! Natural language to Cypher query generation.

use crate::llm::LanguageModel;
use crate::types::{LoreError, Result};
use serde::{Deserialize, Serialize};

/// System prompt describing the graph and the query conventions.
pub const CYPHER_SYSTEM_PROMPT: &str = r#"You answer questions about the Dark Souls universe using a Neo4j knowledge graph.

The graph contains five node types: Weapon, Spell, Shield, Gift, and Entity.
Every node has a `name` property.

Relationships connect nodes and state facts, for example:
(:Weapon)-[:WIELDED_BY]->(:Entity)
(:Spell)-[:CREATED_BY]->(:Entity)
(:Gift)-[:GIVEN_TO]->(:Entity)
and many more. Nodes of different types may be connected.

Convert the user's question into ONE valid Cypher query. Identify nodes by their
`name` property. When a node's type is unknown, use an unlabeled variable so the
query searches across all node types:

MATCH (n)-[:RELATIONSHIP]->(m {name: "X"})
RETURN n

MATCH (n {name: "X"})-[r]->(m)
RETURN r, m

Examples:
Question: "Who wields the Chaos Blade?"
Cypher: MATCH (w)-[:WIELDED_BY]->(e:Entity) WHERE w.name = "Chaos Blade" RETURN e.name

Question: "What is the effect of Power Within?"
Cypher: MATCH (s)-[:EFFECT_ON]->(e) WHERE s.name = "Power Within" RETURN e.name

Question: "What is the Pendant?"
Cypher: MATCH (n) WHERE n.name = "Pendant" RETURN labels(n), properties(n)

When you use UNION, every branch must return the same columns:
MATCH (s:Shield)-[:FOUND_IN]->(e:Entity {name: 'Anor Londo'})
RETURN s.name AS item, 'Shield' AS type
UNION
MATCH (g:Gift)-[:FOUND_IN]->(e:Entity {name: 'Anor Londo'})
RETURN g.name AS item, 'Gift' AS type

Output only the Cypher query."#;

/// Query produced by the generator, with the completion it was extracted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateQuery {
    /// Cypher text exactly as generated (before normalization)
    pub query: String,
    /// Full model completion
    pub completion: String,
}

/// Generates candidate Cypher queries from questions.
pub struct CypherGenerator<L> {
    llm: L,
}

impl<L: LanguageModel> CypherGenerator<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Translate a question into a candidate Cypher query.
    ///
    /// # Errors
    ///
    /// Returns `LoreError::Llm` if the model call fails and
    /// `LoreError::Generation` if the completion holds no query
    pub async fn generate(&self, question: &str) -> Result<CandidateQuery> {
        let completion = self
            .llm
            .complete(Some(CYPHER_SYSTEM_PROMPT), question)
            .await?;

        let query = extract_cypher(&completion);
        if query.is_empty() {
            return Err(LoreError::Generation(format!(
                "no Cypher query in model response: {:?}",
                completion
            )));
        }

        tracing::info!(query = %query, "Generated Cypher query");
        Ok(CandidateQuery { query, completion })
    }
}

/// Pull the Cypher query out of a model completion.
///
/// Handles:
/// - ```cypher ... ```
/// - ``` ... ```
/// - a leading `Cypher:` tag
pub fn extract_cypher(text: &str) -> String {
    let text = text.trim();

    let body = match text.find("```") {
        Some(start) => {
            let rest = &text[start + 3..];
            // Skip the language tag line.
            let rest = match rest.find('\n') {
                Some(nl) if rest[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
                    &rest[nl + 1..]
                }
                _ => rest,
            };
            match rest.find("```") {
                Some(end) => &rest[..end],
                None => rest,
            }
        }
        None => text,
    };

    let body = body.trim().trim_start_matches('→').trim_start();
    let body = match body.get(..7) {
        Some(tag) if tag.eq_ignore_ascii_case("cypher:") => &body[7..],
        _ => body,
    };

    body.trim().to_string()
}
