//! Normalizer: turns a batch of heterogeneous [`RawRecord`]s into
//! [`CanonicalRecord`]s.
//!
//! Two steps, both driven by the first record of the batch:
//!
//! 1. [`infer_fields`] picks the raw key that supplies the category label and
//!    the raw key that supplies the numeric value. Preferred key names win;
//!    otherwise the first string-typed (category) or number-typed (value) key
//!    is used.
//! 2. [`normalize_with`] applies that choice to every record, coercing each
//!    field to a safe default rather than failing.
//!
//! Inference reads only the first record. Later records with a different key
//! set keep the first record's choice and degrade to placeholder labels and
//! zero values.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::types::{CanonicalRecord, FieldInference, RawRecord};

/// Category key names checked before any type-based fallback, in priority order.
pub const CATEGORY_KEYS: [&str; 10] = [
    "category", "name", "label", "country", "region", "product", "type", "group", "item", "title",
];

/// Value key names checked before any type-based fallback, in priority order.
pub const VALUE_KEYS: [&str; 10] = [
    "value", "amount", "count", "quantity", "price", "sales", "revenue", "total", "score", "rating",
];

/// Raw key whose value, when present, is used as the record's timestamp.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Spacing between synthesized timestamps of consecutive records.
pub const TIMESTAMP_STEP_MS: i64 = 60_000;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" for timestamp synthesis.
pub trait Clock {
    /// Current instant in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Field inference
// ---------------------------------------------------------------------------

/// Choose the category and value keys for a batch.
///
/// Only the first record is inspected. An empty batch yields
/// [`FieldInference::default`].
pub fn infer_fields(records: &[RawRecord]) -> FieldInference {
    let Some(first) = records.first() else {
        return FieldInference::default();
    };

    let category_field = pick_category_field(first)
        .unwrap_or_else(|| FieldInference::default().category_field);
    let value_field = pick_value_field(first, &category_field);

    tracing::debug!(
        category_field = %category_field,
        value_field = %value_field,
        keys = first.len(),
        "inferred fields"
    );

    FieldInference { category_field, value_field }
}

fn pick_category_field(record: &RawRecord) -> Option<String> {
    if let Some(key) = CATEGORY_KEYS.iter().find(|k| record.contains_key(**k)) {
        return Some((*key).to_string());
    }
    if let Some((key, _)) = record.iter().find(|(_, v)| v.is_string()) {
        return Some(key.clone());
    }
    record.keys().next().cloned()
}

/// The preferred-list match is not checked against the category field, so
/// both fields can resolve to the same key (e.g. `{"value": "abc"}`).
///
/// Numbers win over numeric-looking strings, which is all a CSV row holds.
fn pick_value_field(record: &RawRecord, category_field: &str) -> String {
    if let Some(key) = VALUE_KEYS.iter().find(|k| record.contains_key(**k)) {
        return (*key).to_string();
    }
    let candidates = || record.iter().filter(|(k, _)| k.as_str() != category_field);
    if let Some((key, _)) = candidates()
        .find(|(_, v)| v.is_number())
        .or_else(|| candidates().find(|(_, v)| is_numeric_text(v)))
    {
        return key.clone();
    }
    record
        .keys()
        .find(|k| k.as_str() != category_field)
        .cloned()
        .unwrap_or_else(|| FieldInference::default().value_field)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// The canonical records of a batch together with the inference that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub fields: FieldInference,
    pub records: Vec<CanonicalRecord>,
}

/// Normalize a batch against the wall clock.
pub fn normalize(records: &[RawRecord]) -> Vec<CanonicalRecord> {
    normalize_with(records, &SystemClock)
}

/// Normalize a batch, synthesizing missing timestamps from `clock`.
pub fn normalize_with<C: Clock + ?Sized>(records: &[RawRecord], clock: &C) -> Vec<CanonicalRecord> {
    normalize_batch_with(records, clock).records
}

/// Normalize a batch and also return the inferred fields.
///
/// Output length and order always match the input. The clock is read once,
/// so synthesized timestamps are exactly [`TIMESTAMP_STEP_MS`] apart.
pub fn normalize_batch_with<C: Clock + ?Sized>(
    records: &[RawRecord],
    clock: &C,
) -> NormalizedBatch {
    if records.is_empty() {
        return NormalizedBatch {
            fields: FieldInference::default(),
            records: Vec::new(),
        };
    }

    let fields = infer_fields(records);
    let now = clock.now_millis();

    let out = records
        .iter()
        .enumerate()
        .map(|(i, record)| CanonicalRecord {
            category: category_label(record.get(&fields.category_field), i),
            value: coerce_number(record.get(&fields.value_field)),
            timestamp: record_timestamp(record.get(TIMESTAMP_KEY))
                .unwrap_or_else(|| synthesized_timestamp(now, i)),
        })
        .collect();

    tracing::trace!(count = records.len(), "normalized batch");

    NormalizedBatch { fields, records: out }
}

fn synthesized_timestamp(now: i64, index: usize) -> i64 {
    let offset = i64::try_from(index)
        .unwrap_or(i64::MAX)
        .saturating_mul(TIMESTAMP_STEP_MS);
    now.saturating_add(offset)
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Display label for a category cell; falsy cells become `Item {index + 1}`.
pub fn category_label(value: Option<&Value>, index: usize) -> String {
    if is_falsy(value) {
        return format!("Item {}", index + 1);
    }
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => display_number(n),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
        None => format!("Item {}", index + 1),
    }
}

/// Numeric value of a cell. Anything that is not a finite number maps to `0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Timestamp carried by the record itself, in epoch milliseconds.
///
/// Accepts numbers, numeric strings, RFC 3339, `YYYY-MM-DD HH:MM:SS` and
/// `YYYY-MM-DD`. Falsy or unparseable values yield `None`.
pub fn record_timestamp(value: Option<&Value>) -> Option<i64> {
    if is_falsy(value) {
        return None;
    }
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<i64> {
    if let Ok(n) = s.parse::<i64>() {
        return (n != 0).then_some(n);
    }
    if let Ok(f) = s.parse::<f64>() {
        return (f.is_finite() && f != 0.0).then(|| f.round() as i64);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Absent, `null`, `""`, `0` and `false` are falsy.
fn is_numeric_text(value: &Value) -> bool {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .is_some_and(f64::is_finite)
}

fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// `2025` rather than `2025.0` for integral numbers.
fn display_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
