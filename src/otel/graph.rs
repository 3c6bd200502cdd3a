//! Graph query instrumentation.

use tracing::{field, span, Level, Span};

/// Create graph query span.
///
/// # Arguments
///
/// * `query_text` - Cypher text as sent to the database
/// * `namespace` - Database name (optional)
///
/// # Returns
///
/// Tracing span with query attributes; `db.response.returned_rows` is left
/// empty for [`record_graph_metrics`]
pub fn graph_query_span(query_text: &str, namespace: Option<&str>) -> Span {
    let span_name = match namespace {
        Some(ns) => format!("query {}", ns),
        None => "query".to_string(),
    };

    let span = span!(
        Level::INFO,
        "graph.query",
        otel.name = %span_name,
        otel.kind = "client",
        db.system.name = "neo4j",
        db.operation.name = "query",
        db.query.text = query_text,
        db.namespace = field::Empty,
        db.response.returned_rows = field::Empty,
    );

    if let Some(ns) = namespace {
        span.record("db.namespace", ns);
    }

    span
}

/// Record returned row count in the current span.
pub fn record_graph_metrics(rows_returned: usize) {
    Span::current().record("db.response.returned_rows", rows_returned);
}
