//! Result shaping: raw graph rows into a uniform, tagged result.
//!
//! A node or relationship value is reduced to its `name` property. The shaped
//! result is classified once by row arity so the synthesizer can dispatch on
//! it exhaustively.

use crate::types::RawRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One shaped row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapedRow {
    /// `RETURN n` or `RETURN n.name`: the value rendered as text
    Single(String),
    /// `RETURN a, b`: each value reduced to its name when it has one
    Pair(Value, Value),
}

/// Shaped graph result, classified by row arity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapedResult {
    /// The graph returned no rows
    Empty,
    /// Every row had one column
    OneColumn(Vec<String>),
    /// Every row had two columns
    TwoColumn(Vec<(Value, Value)>),
    /// Mixed arities, or no row of a supported arity
    Unsupported,
}

impl ShapedResult {
    /// Classify already-shaped rows.
    ///
    /// An empty input is [`ShapedResult::Empty`]; rows of a single arity become
    /// the matching variant; anything else is [`ShapedResult::Unsupported`].
    pub fn classify(rows: Vec<ShapedRow>) -> Self {
        if rows.is_empty() {
            return Self::Empty;
        }

        if rows.iter().all(|r| matches!(r, ShapedRow::Single(_))) {
            let values = rows
                .into_iter()
                .filter_map(|r| match r {
                    ShapedRow::Single(v) => Some(v),
                    ShapedRow::Pair(..) => None,
                })
                .collect();
            return Self::OneColumn(values);
        }

        if rows.iter().all(|r| matches!(r, ShapedRow::Pair(..))) {
            let pairs = rows
                .into_iter()
                .filter_map(|r| match r {
                    ShapedRow::Pair(a, b) => Some((a, b)),
                    ShapedRow::Single(_) => None,
                })
                .collect();
            return Self::TwoColumn(pairs);
        }

        Self::Unsupported
    }

    /// Number of shaped rows (zero for `Empty` and `Unsupported`).
    pub fn len(&self) -> usize {
        match self {
            Self::OneColumn(v) => v.len(),
            Self::TwoColumn(v) => v.len(),
            Self::Empty | Self::Unsupported => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shape raw graph rows.
///
/// # Arguments
///
/// * `rows` - Rows in the order the graph returned them
///
/// # Returns
///
/// Classified result. Rows with neither one nor two columns are dropped and
/// logged; if every row is dropped the result is `Unsupported`.
pub fn shape(rows: &[RawRow]) -> ShapedResult {
    if rows.is_empty() {
        return ShapedResult::Empty;
    }

    let mut shaped = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match shape_row(row) {
            Some(r) => shaped.push(r),
            None => tracing::warn!(
                row = index,
                arity = row.len(),
                "Dropping graph row with unsupported arity"
            ),
        }
    }

    if shaped.is_empty() {
        return ShapedResult::Unsupported;
    }

    ShapedResult::classify(shaped)
}

/// Shape a single row, or `None` if its arity is not 1 or 2.
pub fn shape_row(row: &RawRow) -> Option<ShapedRow> {
    let values: Vec<&Value> = row.values().collect();
    match values.as_slice() {
        [value] => Some(ShapedRow::Single(match name_of(value) {
            Some(name) => render_value(name),
            None => render_value(value),
        })),
        [a, b] => Some(ShapedRow::Pair(reduce(a), reduce(b))),
        _ => None,
    }
}

/// Plain-text rendering of a value: strings without quotes, everything else
/// as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn name_of(value: &Value) -> Option<&Value> {
    value.as_object().and_then(|obj| obj.get("name"))
}

fn reduce(value: &Value) -> Value {
    name_of(value).unwrap_or(value).clone()
}
