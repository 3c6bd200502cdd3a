//! Tracing spans for external calls.
//!
//! Span names and attributes follow OpenTelemetry semantic conventions so an
//! OTLP-aware subscriber can export them unchanged:
//! - https://opentelemetry.io/docs/specs/semconv/database/database-spans/
//! - https://opentelemetry.io/docs/specs/semconv/gen-ai/gen-ai-spans/
//!
//! # Graph Query Conventions
//!
//! **Span name**: `graph.query`, `otel.name = "query {db.namespace}"`
//! - `db.system.name`: Always `"neo4j"`
//! - `db.query.text`: Normalized Cypher
//! - `db.response.returned_rows`: Recorded after execution
//!
//! # LLM Conventions
//!
//! **Span name**: `llm.complete`
//! - `gen_ai.request.model`: Model name
//! - `gen_ai.operation.name`: `chat` or `completion`
//!
//! # Example
//!
//! ```rust,ignore
//! use lore_graph_qa::otel::{graph_query_span, record_graph_metrics};
//!
//! let span = graph_query_span("MATCH (n) RETURN n", Some("neo4j"));
//! let _guard = span.entered();
//! record_graph_metrics(rows.len());
//! ```

pub mod graph;
pub mod llm;

pub use graph::{graph_query_span, record_graph_metrics};
pub use llm::llm_span;
