//! Directory scanner.
//!
//! Walks the served root, collects every file whose relative path ends with a
//! configured extension and, in the same pass, registers every directory it
//! visits with a fresh filesystem watcher. The pair is returned together so
//! the watch loop can swap both at once.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serve_videos_common::paths::relative_path;
use serve_videos_common::{Error, ExtensionSet, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::state::FileIndex;

/// Live change subscription for the directories seen by one scan.
///
/// Dropping or [closing](WatchHandle::close) the handle releases the
/// underlying OS watches. Directories created after the scan are not covered;
/// the next rescan picks them up.
pub struct WatchHandle {
    watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    root: PathBuf,
    watched_dirs: usize,
}

impl WatchHandle {
    /// Wait for the next notification from the watcher.
    pub async fn next_event(&mut self) -> Option<notify::Result<Event>> {
        self.events.recv().await
    }

    /// Number of directories successfully registered with the watcher.
    pub fn watched_dirs(&self) -> usize {
        self.watched_dirs
    }

    /// Release the OS watches held by this handle.
    pub fn close(self) {
        debug!(
            root = %self.root.display(),
            watched_dirs = self.watched_dirs,
            "Closing watch handle"
        );
        drop(self.watcher);
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("root", &self.root)
            .field("watched_dirs", &self.watched_dirs)
            .finish_non_exhaustive()
    }
}

/// Scan `root` for files matching `extensions`.
///
/// Fails only when the watcher cannot be created or `root` itself cannot be
/// read. A directory that cannot be watched is logged and skipped, as are
/// unreadable entries below the root and names that are not valid UTF-8.
pub fn scan(root: &Path, extensions: &ExtensionSet) -> Result<(WatchHandle, FileIndex)> {
    let start = Instant::now();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        // The receiver is gone once the handle is closed; late events are moot.
        let _ = event_tx.send(res);
    })
    .map_err(|e| Error::watch(root, e))?;

    let mut files = Vec::new();
    let mut watched_dirs = 0usize;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(std::io::Error::from(e).into()),
            Err(e) => {
                warn!(error = %e, "Cannot access entry");
                continue;
            }
        };

        if entry.file_type().is_dir() {
            match watcher.watch(entry.path(), RecursiveMode::NonRecursive) {
                Ok(()) => watched_dirs += 1,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Failed to watch directory");
                }
            }
            continue;
        }

        let Some(rel) = relative_path(root, entry.path()) else {
            debug!(path = %entry.path().display(), "Skipping non UTF-8 path");
            continue;
        };
        if extensions.matching(&rel).is_some() {
            files.push(rel);
        }
    }

    let index = FileIndex::from_unsorted(files);
    info!(
        root = %root.display(),
        num_files = index.len(),
        watched_dirs,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Done scanning"
    );

    let handle = WatchHandle {
        watcher,
        events: event_rx,
        root: root.to_path_buf(),
        watched_dirs,
    };
    Ok((handle, index))
}
