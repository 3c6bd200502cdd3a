//! Graph domain types: node categories and raw result rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Node category (label) in the lore graph.
///
/// The graph has exactly five node labels; every node carries a `name` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Weapon,
    Spell,
    Shield,
    Gift,
    Entity,
}

impl Category {
    /// All categories, in the order they are listed to the query generator.
    pub const ALL: [Category; 5] = [
        Category::Weapon,
        Category::Spell,
        Category::Shield,
        Category::Gift,
        Category::Entity,
    ];

    /// Label as written in Cypher.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "Weapon",
            Self::Spell => "Spell",
            Self::Shield => "Shield",
            Self::Gift => "Gift",
            Self::Entity => "Entity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// One row returned by the graph, as `(column alias, value)` pairs.
///
/// Pair order is the projection order of the query's `RETURN` clause.
/// Node and relationship values arrive as JSON objects holding their properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    columns: Vec<(String, Value)>,
}

impl RawRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, keeping projection order.
    pub fn with(mut self, alias: impl Into<String>, value: Value) -> Self {
        self.push(alias, value);
        self
    }

    /// Append a column in place.
    pub fn push(&mut self, alias: impl Into<String>, value: Value) {
        self.columns.push((alias.into(), value));
    }

    /// Column values in projection order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(|(_, v)| v)
    }

    /// Look up a value by column alias.
    pub fn get(&self, alias: &str) -> Option<&Value> {
        self.columns.iter().find(|(a, _)| a == alias).map(|(_, v)| v)
    }

    /// Number of projected columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(String, Value)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("Ring".parse::<Category>().is_err());
    }

    #[test]
    fn test_raw_row_keeps_projection_order() {
        let row = RawRow::new()
            .with("w", json!({"name": "Chaos Blade"}))
            .with("e", json!("Anor Londo"));

        let values: Vec<&Value> = row.values().collect();
        assert_eq!(values[0], &json!({"name": "Chaos Blade"}));
        assert_eq!(values[1], &json!("Anor Londo"));
        assert_eq!(row.get("e"), Some(&json!("Anor Londo")));
        assert_eq!(row.len(), 2);
    }
}
