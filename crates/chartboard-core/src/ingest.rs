//! Upload parsing: turns uploaded JSON or CSV text into [`RawRecord`]s.
//!
//! Parsing is the only place a dataset can be rejected outright. Everything
//! past this point (inference, coercion) degrades to defaults instead of
//! failing.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::types::RawRecord;

/// Errors raised while parsing an uploaded dataset.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported upload format: {0}")]
    UnsupportedFormat(String),

    #[error("upload is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),

    #[error("element {index} is not a record (found {found})")]
    NotARecord { index: usize, found: &'static str },

    #[error("CSV has no header row")]
    EmptyCsv,

    #[error("CSV line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Format of an uploaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Json,
    Csv,
}

impl UploadFormat {
    /// Detect the format from a file extension (`.json` / `.csv`).
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(UploadFormat::Json),
            Some("csv") => Ok(UploadFormat::Csv),
            Some(other) => Err(IngestError::UnsupportedFormat(format!(".{other}"))),
            None => Err(IngestError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
        }
    }

    /// Detect the format from an HTTP `Content-Type` header value.
    pub fn from_content_type(content_type: &str) -> Result<Self, IngestError> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/json" | "text/json" => Ok(UploadFormat::Json),
            "text/csv" | "application/csv" => Ok(UploadFormat::Csv),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read a local file and parse it according to its extension.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, IngestError> {
    let path = path.as_ref();
    let format = UploadFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_upload(&bytes, format)?;
    tracing::debug!(path = %path.display(), ?format, records = records.len(), "loaded upload");
    Ok(records)
}

/// Parse raw upload bytes in the given format.
pub fn parse_upload(bytes: &[u8], format: UploadFormat) -> Result<Vec<RawRecord>, IngestError> {
    let text = std::str::from_utf8(bytes)?;
    match format {
        UploadFormat::Json => parse_json(text),
        UploadFormat::Csv => parse_csv(text),
    }
}

/// Parse a JSON array of flat objects.
pub fn parse_json(text: &str) -> Result<Vec<RawRecord>, IngestError> {
    let value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
    records_from_value(value)
}

/// Convert an already-parsed JSON value into records.
pub fn records_from_value(value: Value) -> Result<Vec<RawRecord>, IngestError> {
    let Value::Array(items) = value else {
        return Err(IngestError::NotAnArray(json_kind(&value)));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(IngestError::NotARecord {
                index,
                found: json_kind(&other),
            }),
        })
        .collect()
}

/// Parse CSV with a header row.
///
/// Cells stay strings, so labels such as `02134` or `0` survive verbatim;
/// numeric coercion happens in the normalizer. Blank lines are skipped.
/// Every data row must have as many fields as the header.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header_name)
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(csv_error)?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| (name.clone(), Value::String(cell.to_string())))
            .collect();
        records.push(record);
    }

    tracing::debug!(columns = headers.len(), rows = records.len(), "parsed csv");
    Ok(records)
}

/// Spreadsheet exports often start with a UTF-8 BOM on the first header.
fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn csv_error(err: csv::Error) -> IngestError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("expected {expected_len} fields, found {len}")
        }
        _ => err.to_string(),
    };
    IngestError::Csv { line, message }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
