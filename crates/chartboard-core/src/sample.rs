//! Built-in datasets.
//!
//! [`server_seed`] is what the data endpoint serves before anything has been
//! posted; [`dashboard_default`] is what the dashboard draws before it has
//! loaded anything.

use serde_json::{json, Value};

use crate::types::RawRecord;

/// Six-country dataset served by an empty store.
pub fn server_seed() -> Vec<Value> {
    [
        ("USA", 2025),
        ("India", 1000),
        ("China", 1882),
        ("Germany", 1322),
        ("UK", 1122),
        ("France", 1114),
    ]
    .into_iter()
    .map(|(country, value)| json!({ "country": country, "value": value }))
    .collect()
}

/// Eleven-country dataset shown by the dashboard at start-up.
pub fn dashboard_default() -> Vec<RawRecord> {
    const ROWS: &[(&str, i64)] = &[
        ("USA", 2025),
        ("China", 1882),
        ("Japan", 1809),
        ("Germany", 1322),
        ("UK", 1122),
        ("France", 1114),
        ("India", 984),
        ("Spain", 711),
        ("Netherlands", 665),
        ("South Korea", 443),
        ("Canada", 441),
    ];

    ROWS.iter()
        .map(|(country, value)| {
            let mut record = RawRecord::new();
            record.insert("country".to_string(), json!(country));
            record.insert("value".to_string(), json!(value));
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_are_records() {
        assert_eq!(server_seed().len(), 6);
        assert!(server_seed().iter().all(Value::is_object));
        assert_eq!(dashboard_default().len(), 11);
    }
}
