//! Test builders: ergonomic constructors for raw records and batches.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chartboard_core::{
    normalizer::{normalize_batch_with, NormalizedBatch},
    FixedClock, RawRecord,
};
use serde_json::Value;

/// Base instant used by every harness that normalizes: 2024-01-15T10:00:00Z.
pub const FIXED_NOW: i64 = 1_705_312_800_000;

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawRecord`] fixtures. Keys keep insertion order.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new()
///     .field("product", "Tea")
///     .field("sales", 12)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct RecordBuilder {
    record: RawRecord,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.record.insert(key.to_string(), value.into());
        self
    }

    pub fn null(mut self, key: &str) -> Self {
        self.record.insert(key.to_string(), Value::Null);
        self
    }

    pub fn build(self) -> RawRecord {
        self.record
    }
}

/// Convert a `json!` object literal into a [`RawRecord`].
pub fn record(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("record() expects a JSON object, got {other}"),
    }
}

/// Convert a `json!` array of objects into records.
pub fn records(value: Value) -> Vec<RawRecord> {
    match value {
        Value::Array(items) => items.into_iter().map(record).collect(),
        other => panic!("records() expects a JSON array, got {other}"),
    }
}

/// Normalize against [`FIXED_NOW`].
pub fn normalize_fixed(records: &[RawRecord]) -> NormalizedBatch {
    normalize_batch_with(records, &FixedClock(FIXED_NOW))
}
