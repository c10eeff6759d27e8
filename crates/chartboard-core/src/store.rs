//! Store: the file-backed dataset behind the data endpoint.
//!
//! Holds exactly one dataset: the last array written. Every write replaces
//! the previous one. No schema is imposed on the array's elements.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::sample;

/// Errors raised by [`DatasetStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset file {path} does not hold a JSON array: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// A single JSON array persisted to one file.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored dataset.
    ///
    /// Returns the seed dataset when nothing has been written yet.
    pub fn load(&self) -> Result<Vec<Value>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no dataset yet, serving seed");
                return Ok(sample::server_seed());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(_) => Err(self.corrupt("top-level value is not an array")),
            Err(e) => Err(self.corrupt(e.to_string())),
        }
    }

    /// Replace the stored dataset.
    ///
    /// The file is written to a sibling temp file and renamed into place, so
    /// readers never see a partial write.
    pub fn save(&self, items: &[Value]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        serde_json::to_writer_pretty(&mut tmp, items)
            .map_err(|e| self.io_error(std::io::Error::other(e)))?;
        tmp.write_all(b"\n").map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        tracing::debug!(path = %self.path.display(), count = items.len(), "dataset written");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
