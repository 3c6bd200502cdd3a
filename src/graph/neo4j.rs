//! Neo4j client over the HTTP transactional endpoint.
//!
//! Each query is sent as a single auto-committed statement to
//! `POST {url}/db/{database}/tx/commit`. Rows come back in the `row` format,
//! where nodes and relationships are rendered as their property maps.

use crate::graph::GraphStore;
use crate::otel::{graph_query_span, record_graph_metrics};
use crate::types::{LoreError, RawRow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::Instrument;

/// Transactional endpoint response.
#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Neo4jError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Neo4jError {
    code: String,
    message: String,
}

/// Neo4j HTTP client.
pub struct Neo4jHttpClient {
    url: String,
    database: String,
    username: String,
    password: String,
    client: Client,
}

impl Neo4jHttpClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `url` - HTTP(S) base URL (e.g., "https://xxxx.databases.neo4j.io")
    /// * `username` - Basic auth user
    /// * `password` - Basic auth password
    pub fn new(url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            database: "neo4j".to_string(),
            username: username.into(),
            password: password.into(),
            client: Client::new(),
        }
    }

    /// Target a database other than the default `neo4j`.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn commit_url(&self) -> String {
        format!("{}/db/{}/tx/commit", self.url, self.database)
    }

    async fn execute(&self, cypher: &str) -> Result<Vec<RawRow>> {
        let response = self
            .client
            .post(self.commit_url())
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
            .json(&json!({
                "statements": [
                    {"statement": cypher, "resultDataContents": ["row"]}
                ]
            }))
            .send()
            .await
            .map_err(|e| LoreError::graph(format!("Neo4j request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LoreError::graph(format!("Failed to read Neo4j response: {}", e)))?;

        if !status.is_success() {
            return Err(LoreError::graph(format!("Neo4j error {}: {}", status, body)));
        }

        let parsed: TxResponse = serde_json::from_str(&body)
            .map_err(|e| LoreError::graph(format!("Failed to parse Neo4j response: {}", e)))?;

        if let Some(err) = parsed.errors.first() {
            return Err(LoreError::graph(format!("{}: {}", err.code, err.message)));
        }

        let Some(result) = parsed.results.into_iter().next() else {
            return Ok(Vec::new());
        };

        let columns = result.columns;
        let rows = result
            .data
            .into_iter()
            .map(|d| columns.iter().cloned().zip(d.row).collect::<RawRow>())
            .collect();

        Ok(rows)
    }
}

#[async_trait]
impl GraphStore for Neo4jHttpClient {
    async fn query(&self, cypher: &str) -> Result<Vec<RawRow>> {
        let span = graph_query_span(cypher, Some(&self.database));
        async {
            let rows = self.execute(cypher).await?;
            record_graph_metrics(rows.len());
            Ok::<_, LoreError>(rows)
        }
        .instrument(span)
        .await
    }
}
