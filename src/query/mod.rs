//! Cypher query normalization.
//!
//! LLM-generated Cypher is repaired in two text rewrites before execution:
//!
//! 1. **Label stripping**: `(w:Weapon)` becomes `(w)`. The generator often
//!    asserts the wrong category for a node, so matching by name alone across
//!    all categories trades precision for recall.
//! 2. **Union canonicalization**: every `MATCH (x:Type) ... RETURN y.name AS alias`
//!    branch is rewritten to `RETURN y.name AS item, 'Type' AS type`, so all
//!    branches of a `UNION` project the same two columns.
//!
//! The second rewrite detects branches through their `:Type` annotation, which
//! the first rewrite may already have removed. [`NormalizeOrder`] selects
//! whether canonicalization sees the stripped or the original text.

use crate::types::Category;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static CATEGORY_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    let labels = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\((\w+):(?:{})\)", labels)).expect("category label pattern is valid")
});

// Trailing `, 'T' AS type` is consumed so a canonical clause rewrites to itself.
static UNION_RETURN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(MATCH\s*\(\w+:(\w+)\)[^)]+?\)\s*)RETURN\s*(\w+)\.name\s+AS\s+\w+(?:\s*,\s*'[^']*'\s+AS\s+type\b)?",
    )
    .expect("union return pattern is valid")
});

/// Order in which the two normalization steps see the query text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizeOrder {
    /// Strip labels, then canonicalize the stripped text.
    ///
    /// Branches annotated with one of the five categories lose the annotation
    /// before canonicalization looks for it, so they keep their original `RETURN`.
    #[default]
    StripFirst,
    /// Canonicalize against the annotated text, then strip labels.
    CanonicalizeFirst,
}

impl NormalizeOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StripFirst => "strip-first",
            Self::CanonicalizeFirst => "canonicalize-first",
        }
    }
}

impl fmt::Display for NormalizeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizeOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strip-first" => Ok(Self::StripFirst),
            "canonicalize-first" => Ok(Self::CanonicalizeFirst),
            other => Err(format!(
                "unknown normalize order '{}' (expected strip-first or canonicalize-first)",
                other
            )),
        }
    }
}

/// Rewrites candidate Cypher into an executable, consistently-shaped query.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryNormalizer {
    order: NormalizeOrder,
}

impl QueryNormalizer {
    pub fn new(order: NormalizeOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> NormalizeOrder {
        self.order
    }

    /// Normalize a candidate query.
    ///
    /// # Arguments
    ///
    /// * `raw` - Cypher text as produced by the query generator
    ///
    /// # Returns
    ///
    /// Query with category labels stripped and union returns canonicalized.
    /// Applying this twice yields the same text as applying it once.
    pub fn normalize(&self, raw: &str) -> String {
        let normalized = match self.order {
            NormalizeOrder::StripFirst => {
                canonicalize_union_returns(&strip_category_labels(raw))
            }
            NormalizeOrder::CanonicalizeFirst => {
                strip_category_labels(&canonicalize_union_returns(raw))
            }
        };

        if normalized != raw {
            tracing::debug!(order = %self.order, raw, normalized = %normalized, "Normalized Cypher query");
        }

        normalized
    }
}

/// Normalize with the default [`NormalizeOrder::StripFirst`] order.
pub fn normalize(raw: &str) -> String {
    QueryNormalizer::default().normalize(raw)
}

/// Remove category labels from bare node patterns.
///
/// Only `(<var>:<Category>)` is rewritten. Patterns with a property map such as
/// `(e:Entity {name: 'Anor Londo'})`, or with labels outside the five
/// categories, are left as written.
pub fn strip_category_labels(query: &str) -> String {
    CATEGORY_LABEL.replace_all(query, "(${1})").into_owned()
}

/// Rewrite annotated `MATCH ... RETURN x.name AS alias` branches to the
/// canonical `RETURN x.name AS item, '<Type>' AS type` projection.
///
/// Everything before the `RETURN` keyword is preserved. Branches whose first
/// node has no `:Type` annotation are not touched.
pub fn canonicalize_union_returns(query: &str) -> String {
    UNION_RETURN
        .replace_all(query, |caps: &Captures| {
            format!("{}RETURN {}.name AS item, '{}' AS type", &caps[1], &caps[3], &caps[2])
        })
        .into_owned()
}
