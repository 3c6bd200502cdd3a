//! Summarization prompts and result rendering.

use crate::shape::render_value;
use serde_json::Value;

/// Render values as a natural-language list.
///
/// One value is rendered bare; otherwise `", and "` precedes the last value:
/// `"A, and B"`, `"A, B, and C"`.
pub fn render_value_list(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

/// Render subject–object pairs as `- A → B` bullet lines.
pub fn render_pairs(pairs: &[(Value, Value)]) -> String {
    pairs
        .iter()
        .map(|(a, b)| format!("- {} → {}", render_value(a), render_value(b)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for a summary of a list of items.
pub fn list_summary_prompt(question: &str, value_list: &str) -> String {
    format!(
        "You are a Dark Souls lore expert. The user asked:\n\n\
         \"{question}\"\n\n\
         These are the relevant items or entities:\n\
         {value_list}\n\n\
         Write a natural language summary listing these items.\n"
    )
}

/// Prompt asking for a summary of relationships.
pub fn pair_summary_prompt(question: &str, bullet_list: &str) -> String {
    format!(
        "You are a Dark Souls lore expert.\n\n\
         Given the user's question and these subject–object pairs, summarize the relationships in a clear sentence.\n\n\
         Question:\n\
         {question}\n\n\
         Pairs:\n\
         {bullet_list}\n\n\
         Summary:\n"
    )
}
