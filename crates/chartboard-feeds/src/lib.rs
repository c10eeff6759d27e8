//! chartboard-feeds: dataset sources for chartboard.
//!
//! Each feed produces raw records that the caller normalizes with
//! [`chartboard_core::normalizer`]. The HTTP feed can also publish a
//! normalized dataset back to the data endpoint.

use std::future::Future;
use std::path::PathBuf;

use chartboard_core::ingest::IngestError;
use chartboard_core::RawRecord;

pub mod file;
pub mod http;

pub use file::{FileFeed, FileWatcher};
pub use http::HttpFeed;

/// Errors raised while loading from or publishing to a feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to build request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("{endpoint} answered {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to encode dataset: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("cannot watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// A source of raw records.
pub trait Feed: Send + Sync {
    /// Short human-readable description, shown in the dashboard status line.
    fn describe(&self) -> String;

    /// Load the current dataset.
    fn load(&self) -> impl Future<Output = Result<Vec<RawRecord>, FeedError>> + Send;
}
