//! Static upload corpora used across harnesses.
//!
//! Each constant is a complete upload body, as a user would select it in the
//! dashboard or POST it to the data server.

/// The six-country dataset in the shape the data server seeds itself with.
pub const JSON_COUNTRIES: &str = r#"[
  {"country": "USA", "value": 2025},
  {"country": "India", "value": 1000},
  {"country": "China", "value": 1882}
]"#;

/// Preferred keys beyond the first in each list, with numeric strings.
pub const JSON_SALES: &str = r#"[
  {"product": "Tea", "sales": "12.5", "region": "North"},
  {"product": "Coffee", "sales": "30", "region": "South"},
  {"product": "Cocoa", "sales": "n/a", "region": "East"}
]"#;

/// No preferred keys at all: falls back to first string / first number.
pub const JSON_GENERIC: &str = r#"[
  {"foo": "bar", "baz": 42},
  {"foo": "qux", "baz": 7}
]"#;

/// Records that carry their own timestamps in mixed representations.
pub const JSON_TIMESTAMPED: &str = r#"[
  {"label": "a", "count": 1, "timestamp": 1705312800000},
  {"label": "b", "count": 2, "timestamp": "2024-01-15T10:01:00Z"},
  {"label": "c", "count": 3}
]"#;

pub const CSV_TWO_COLUMNS: &str = "category,value\nA,10\nB,20\nC,30\n";

/// Byte-order mark, padded cells, a quoted field with a comma, a blank line.
pub const CSV_MESSY: &str = "\u{feff}name , amount\n\"Smith, J\", 4.5\n\nLee,abc\n";

/// Labels that look numeric: a leading zero, a bare zero, an exponent.
pub const CSV_NUMERIC_LABELS: &str = "zip,value\n02134,5\n0,7\n1e3,9\n";

pub const CSV_RAGGED: &str = "category,value\nA,10\nB\n";

/// Every upload body that must parse, with the number of records it holds.
pub const VALID_UPLOADS: &[(&str, &str, usize)] = &[
    ("countries.json", JSON_COUNTRIES, 3),
    ("sales.json", JSON_SALES, 3),
    ("generic.json", JSON_GENERIC, 2),
    ("timestamped.json", JSON_TIMESTAMPED, 3),
    ("two.csv", CSV_TWO_COLUMNS, 3),
    ("messy.csv", CSV_MESSY, 2),
];
