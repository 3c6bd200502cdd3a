//! Graph database access.

pub mod neo4j;

pub use neo4j::Neo4jHttpClient;

use crate::types::{RawRow, Result};
use async_trait::async_trait;

/// Executes Cypher against a graph database.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a query and return its rows in result order.
    ///
    /// # Errors
    ///
    /// Returns `LoreError::Graph` for syntax errors, connectivity failures and
    /// any other error reported by the database
    async fn query(&self, cypher: &str) -> Result<Vec<RawRow>>;
}

#[async_trait]
impl<T: GraphStore + ?Sized> GraphStore for std::sync::Arc<T> {
    async fn query(&self, cypher: &str) -> Result<Vec<RawRow>> {
        (**self).query(cypher).await
    }
}
