//! chartboard: infer chart fields from arbitrary records and draw them.
//!
//! Heterogeneous JSON / CSV records are normalized into
//! `{category, value, timestamp}` by `chartboard-core`, served and stored by
//! the [`server`] module, and drawn by the `chartboard-tui` dashboard.
//!
//! # Architecture
//!
//! ```text
//! file / HTTP ──► ingest ──► normalizer ──► dashboard
//!                               │
//!        POST /data ──► store ◄─┴── GET /data, /data/normalized
//! ```

pub mod server;

pub use chartboard_core as core;
pub use chartboard_feeds as feeds;
