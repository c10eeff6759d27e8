//! Core types for chartboard-core.
//!
//! This module defines the data structures shared across every layer: the
//! schema-less [`RawRecord`] produced by upstream parsers, the fixed-shape
//! [`CanonicalRecord`] handed to chart rendering, the [`FieldInference`]
//! result, and the [`ChartKind`] discriminant.

use serde::{Deserialize, Serialize};

/// An upstream, schema-less flat record as received from JSON, CSV or HTTP.
///
/// Keys iterate in insertion order (the order the parser produced them).
/// Field inference depends on that order when it falls back to type-based
/// selection.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// The fixed-shape output of normalization.
///
/// Serialises with exactly the keys `category`, `value` and `timestamp`,
/// which is what the chart renderers and the data endpoint expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Non-empty display label.
    pub category: String,
    /// Numeric magnitude. Always finite.
    pub value: f64,
    /// Milliseconds since the Unix epoch (UTC).
    pub timestamp: i64,
}

/// The two raw-record keys chosen to populate `category` and `value`.
///
/// Derived once per batch from the first record and applied to every record
/// in that batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInference {
    pub category_field: String,
    pub value_field: String,
}

impl Default for FieldInference {
    fn default() -> Self {
        Self {
            category_field: "category".to_string(),
            value_field: "value".to_string(),
        }
    }
}

impl std::fmt::Display for FieldInference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "category={} value={}", self.category_field, self.value_field)
    }
}

/// Which chart the dashboard draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    /// All chart kinds in tab order.
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Pie];

    /// The next chart kind in tab order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            ChartKind::Bar => ChartKind::Line,
            ChartKind::Line => ChartKind::Pie,
            ChartKind::Pie => ChartKind::Bar,
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Pie => write!(f, "pie"),
        }
    }
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            other => Err(format!("unknown chart kind: {other} (expected bar, line or pie)")),
        }
    }
}
