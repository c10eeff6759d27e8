//! File feed: a local `.json` / `.csv` upload, plus a watcher that reports
//! when it changes on disk.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use chartboard_core::ingest::{self, IngestError, UploadFormat};
use chartboard_core::RawRecord;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::{Feed, FeedError};

/// Reads one local file, choosing the parser from its extension.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Feed for FileFeed {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Vec<RawRecord>, FeedError> {
        let format = UploadFormat::from_path(&self.path)?;
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| IngestError::Io {
                path: self.path.clone(),
                source,
            })?;
        let records = ingest::parse_upload(&bytes, format)?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "file feed loaded");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Watcher
// ---------------------------------------------------------------------------

/// Watches a single file for modification.
///
/// The parent directory is watched rather than the file itself: editors
/// commonly save by writing a new file and renaming it over the old one,
/// which would silently end a watch on the original inode.
pub struct FileWatcher {
    path: PathBuf,
    rx: mpsc::Receiver<()>,
    _watcher: RecommendedWatcher,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher").field("path", &self.path).finish()
    }
}

impl FileWatcher {
    /// Start watching `path`. The file's directory must exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let watch_error = |source: notify::Error| FeedError::Watch {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let dir = std::fs::canonicalize(dir).map_err(|e| watch_error(notify::Error::io(e)))?;
        let file_name = path.file_name().ok_or_else(|| {
            watch_error(notify::Error::generic("path has no file name"))
        })?;
        let target = dir.join(file_name);

        let (tx, rx) = mpsc::channel();
        let watched = target.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) if is_change_to(&event, &watched) => {
                    // The receiver may already be gone; nothing to do then.
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "file watcher error"),
            }
        })
        .map_err(watch_error)?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(watch_error)?;

        tracing::debug!(path = %target.display(), "watching file");
        Ok(Self {
            path: target,
            rx,
            _watcher: watcher,
        })
    }

    /// Absolute path of the watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file changed since the last call. Never blocks; drains
    /// every pending notification.
    pub fn try_changed(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

fn is_change_to(event: &notify::Event, target: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| p == target)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
