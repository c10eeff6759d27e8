//! Upload parsing integration harness.
//!
//! # What this covers
//!
//! - **Format detection** from file extensions and content types.
//! - **JSON uploads**: arrays of objects accepted; every other shape rejected
//!   with an error naming what was found.
//! - **CSV uploads**: header row, trimming, BOM, quoting, verbatim cells,
//!   blank lines, ragged rows.
//! - **Files on disk** through `load_file`.
//!
//! # What this does NOT cover
//!
//! - Normalization of the parsed records (see `normalization_harness`).
//!
//! # Running
//!
//! ```sh
//! cargo test --test ingest_harness
//! ```

mod common;
use common::*;

use chartboard_core::ingest::{self, IngestError, UploadFormat};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::path::Path;

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

#[rstest]
#[case("data.json", UploadFormat::Json)]
#[case("DATA.JSON", UploadFormat::Json)]
#[case("nested/dir/sales.csv", UploadFormat::Csv)]
fn format_from_extension(#[case] path: &str, #[case] expected: UploadFormat) {
    assert_eq!(UploadFormat::from_path(Path::new(path)).unwrap(), expected);
}

#[rstest]
#[case("data.xlsx")]
#[case("README")]
fn unsupported_extensions(#[case] path: &str) {
    assert!(matches!(
        UploadFormat::from_path(Path::new(path)),
        Err(IngestError::UnsupportedFormat(_))
    ));
}

#[rstest]
#[case("application/json", UploadFormat::Json)]
#[case("application/json; charset=utf-8", UploadFormat::Json)]
#[case("text/csv", UploadFormat::Csv)]
fn format_from_content_type(#[case] header: &str, #[case] expected: UploadFormat) {
    assert_eq!(UploadFormat::from_content_type(header).unwrap(), expected);
}

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

#[test]
fn every_valid_upload_parses() {
    for (name, body, count) in VALID_UPLOADS {
        let format = UploadFormat::from_path(Path::new(name)).unwrap();
        let parsed = ingest::parse_upload(body.as_bytes(), format)
            .unwrap_or_else(|e| panic!("{name} failed to parse: {e}"));
        assert_eq!(parsed.len(), *count, "{name}");
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn json_keeps_key_order() {
    let parsed = ingest::parse_json(r#"[{"z": 1, "a": "x", "m": 2}]"#).unwrap();
    let keys: Vec<&str> = parsed[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn json_empty_array_is_fine() {
    assert!(ingest::parse_json("[]").unwrap().is_empty());
}

#[rstest]
#[case::object(r#"{"category": "A"}"#)]
#[case::number("42")]
#[case::null("null")]
fn json_non_arrays_are_rejected(#[case] body: &str) {
    assert!(matches!(ingest::parse_json(body), Err(IngestError::NotAnArray(_))));
}

#[test]
fn json_non_record_element_reports_index() {
    let err = ingest::parse_json(r#"[{"a": 1}, [1, 2]]"#).unwrap_err();
    assert!(matches!(err, IngestError::NotARecord { index: 1, .. }), "{err}");
}

#[test]
fn json_syntax_error() {
    assert!(matches!(
        ingest::parse_json(r#"[{"a": 1},"#),
        Err(IngestError::InvalidJson(_))
    ));
}

#[test]
fn invalid_utf8_is_rejected() {
    assert!(matches!(
        ingest::parse_upload(&[0x5b, 0xff, 0x5d], UploadFormat::Json),
        Err(IngestError::Utf8(_))
    ));
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[test]
fn csv_cells_stay_strings() {
    let parsed = ingest::parse_csv(CSV_TWO_COLUMNS).unwrap();
    assert_eq!(parsed[0], record(json!({"category": "A", "value": "10"})));
    assert_eq!(parsed[2], record(json!({"category": "C", "value": "30"})));
}

#[test]
fn csv_numeric_looking_labels_are_not_rewritten() {
    let parsed = ingest::parse_csv(CSV_NUMERIC_LABELS).unwrap();
    assert_eq!(parsed[0]["zip"], json!("02134"));
    assert_eq!(parsed[1]["zip"], json!("0"));
    assert_eq!(parsed[2]["zip"], json!("1e3"));
}

#[test]
fn csv_messy_input() {
    let parsed = ingest::parse_csv(CSV_MESSY).unwrap();
    assert_eq!(
        parsed,
        vec![
            record(json!({"name": "Smith, J", "amount": "4.5"})),
            record(json!({"name": "Lee", "amount": "abc"})),
        ]
    );
}

#[test]
fn csv_with_more_than_two_columns() {
    let parsed = ingest::parse_csv("region,product,sales\nN,Tea,3\n").unwrap();
    assert_eq!(parsed, vec![record(json!({"region": "N", "product": "Tea", "sales": "3"}))]);
}

#[test]
fn csv_header_only_is_empty_dataset() {
    assert!(ingest::parse_csv("category,value\n").unwrap().is_empty());
}

#[test]
fn csv_ragged_row_names_the_line() {
    match ingest::parse_csv(CSV_RAGGED) {
        Err(IngestError::Csv { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("expected 2 fields, found 1"), "{message}");
        }
        other => panic!("expected a CSV error, got {other:?}"),
    }
}

#[test]
fn csv_empty_text_is_rejected() {
    assert!(ingest::parse_csv("").is_err());
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn load_file_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("countries.json");
    let csv_path = dir.path().join("sales.csv");
    std::fs::write(&json_path, JSON_COUNTRIES).unwrap();
    std::fs::write(&csv_path, CSV_TWO_COLUMNS).unwrap();

    assert_eq!(ingest::load_file(&json_path).unwrap().len(), 3);
    assert_eq!(ingest::load_file(&csv_path).unwrap().len(), 3);
}

#[test]
fn load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ingest::load_file(dir.path().join("absent.csv")),
        Err(IngestError::Io { .. })
    ));
}
