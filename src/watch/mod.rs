pub mod settle;

use serve_videos_common::{Error, ExtensionSet, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::scanner::{self, WatchHandle};
use crate::state::{FileIndex, IndexStore};

/// Background task that keeps the [`IndexStore`] in sync with the disk.
///
/// Every notification, whatever its kind, triggers a full rescan. On success
/// the new index is published and the previous watch handle is closed in
/// favour of the new one; on failure the last good index and handle stay in
/// place.
pub struct WatchLoop {
    root: PathBuf,
    extensions: ExtensionSet,
    store: Arc<IndexStore>,
    settle_window: Duration,
}

impl WatchLoop {
    pub fn new(root: PathBuf, extensions: ExtensionSet, store: Arc<IndexStore>) -> Self {
        Self {
            root,
            extensions,
            store,
            settle_window: Duration::ZERO,
        }
    }

    /// Fold events arriving within `window` of each other into one rescan.
    ///
    /// A zero window (the default) rescans once per event.
    pub fn with_settle_window(mut self, window: Duration) -> Self {
        self.settle_window = window;
        self
    }

    /// Run until `cancel` fires, then close the current watch handle.
    pub async fn run(self, mut handle: WatchHandle, cancel: CancellationToken) {
        tracing::info!(
            root = %self.root.display(),
            watched_dirs = handle.watched_dirs(),
            "Watching for changes"
        );

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = handle.next_event() => event,
            };

            match event {
                Some(Ok(event)) => {
                    tracing::info!(kind = ?event.kind, paths = ?event.paths, "Filesystem event");
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Watcher reported an error");
                    continue;
                }
                None => {
                    tracing::error!("Watcher channel closed unexpectedly");
                    break;
                }
            }

            if !self.settle_window.is_zero() {
                let absorbed = settle::settle(&mut handle, self.settle_window).await;
                if absorbed > 0 {
                    tracing::debug!(absorbed, "Coalesced filesystem events");
                }
            }

            match self.rescan().await {
                Ok((new_handle, index)) => {
                    let num_files = index.len();
                    let generation = self.store.publish(index);
                    std::mem::replace(&mut handle, new_handle).close();
                    tracing::debug!(generation, num_files, "Published new index");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Rescan failed; keeping previous index");
                }
            }
        }

        handle.close();
        tracing::info!("File watcher stopped");
    }

    async fn rescan(&self) -> Result<(WatchHandle, FileIndex)> {
        initial_scan(self.root.clone(), self.extensions.clone()).await
    }
}

/// Run [`scanner::scan`] on the blocking thread pool.
pub async fn initial_scan(
    root: PathBuf,
    extensions: ExtensionSet,
) -> Result<(WatchHandle, FileIndex)> {
    tokio::task::spawn_blocking(move || scanner::scan(&root, &extensions))
        .await
        .map_err(|e| Error::internal(format!("scan task failed: {e}")))?
}
