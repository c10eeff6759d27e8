//! chartboard-core: record types and the normalization pipeline.
//!
//! # Architecture
//!
//! ```text
//! upload / HTTP body ──► ingest ──► normalizer ──► CanonicalRecord ──► charts
//!                                        ▲
//!              store (flat JSON file) ───┘
//! ```
//!
//! `ingest` turns JSON or CSV text into schema-less [`RawRecord`]s, the
//! `normalizer` infers which keys carry the category and value and emits
//! [`CanonicalRecord`]s, and the `store` persists the last posted dataset for
//! the data endpoint.

pub mod config;
pub mod ingest;
pub mod normalizer;
pub mod sample;
pub mod store;
pub mod types;

pub use normalizer::{infer_fields, normalize, normalize_with, Clock, FixedClock, SystemClock};
pub use types::{CanonicalRecord, ChartKind, FieldInference, RawRecord};
