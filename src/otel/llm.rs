//! LLM call instrumentation.

use tracing::{span, Level, Span};

/// Create LLM completion span.
///
/// # Arguments
///
/// * `model` - Requested model name
/// * `operation` - `chat` (with system prompt) or `completion`
pub fn llm_span(model: &str, operation: &'static str) -> Span {
    span!(
        Level::INFO,
        "llm.complete",
        otel.name = %format!("{} {}", operation, model),
        otel.kind = "client",
        gen_ai.request.model = model,
        gen_ai.operation.name = operation,
    )
}
