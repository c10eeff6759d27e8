//! Domain-specific assertion macros for chartboard harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear which record of a batch broke.

use chartboard_core::CanonicalRecord;

/// Assert the categories of a batch, in order.
///
/// ```rust
/// assert_categories!(batch.records, ["USA", "India"]);
/// ```
#[macro_export]
macro_rules! assert_categories {
    ($records:expr, [$($category:expr),* $(,)?]) => {{
        let records: &[chartboard_core::CanonicalRecord] = &$records;
        let actual: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();
        let expected: Vec<&str> = vec![$($category),*];
        pretty_assertions::assert_eq!(actual, expected, "categories differ");
    }};
}

/// Assert the values of a batch, in order.
#[macro_export]
macro_rules! assert_values {
    ($records:expr, [$($value:expr),* $(,)?]) => {{
        let records: &[chartboard_core::CanonicalRecord] = &$records;
        let actual: Vec<f64> = records.iter().map(|r| r.value).collect();
        let expected: Vec<f64> = vec![$($value as f64),*];
        pretty_assertions::assert_eq!(actual, expected, "values differ");
    }};
}

/// Assert the inferred `(category_field, value_field)` of a batch.
#[macro_export]
macro_rules! assert_fields {
    ($batch:expr, $category:expr, $value:expr) => {{
        let fields: &chartboard_core::FieldInference = &$batch.fields;
        pretty_assertions::assert_eq!(
            (fields.category_field.as_str(), fields.value_field.as_str()),
            ($category, $value),
            "inferred fields differ"
        );
    }};
}

/// Assert that synthesized timestamps step by one minute from `base`,
/// skipping records at the listed indices (which carry their own).
pub fn assert_synthesized_from(records: &[CanonicalRecord], base: i64, own: &[usize]) {
    for (i, record) in records.iter().enumerate() {
        if own.contains(&i) {
            continue;
        }
        let expected = base + i as i64 * 60_000;
        assert_eq!(
            record.timestamp, expected,
            "record {i} ({:?}) should have synthesized timestamp {expected}",
            record.category
        );
    }
}
