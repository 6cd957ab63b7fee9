//! Published file index shared between the watch loop and HTTP handlers.
//!
//! The watch loop is the only writer; it swaps in a complete new
//! [`FileIndex`] after every successful scan. Handlers take a snapshot (an
//! `Arc` clone under a read lock) and never hold the lock while doing I/O.

mod types;

pub use types::*;

use parking_lot::RwLock;
use serve_videos_common::paths::decode_request_path;
use serve_videos_common::{Error, Result};
use std::sync::Arc;

#[derive(Debug)]
struct Published {
    index: Arc<FileIndex>,
    generation: u64,
}

/// Guarded holder of the currently published [`FileIndex`].
#[derive(Debug)]
pub struct IndexStore {
    current: RwLock<Published>,
}

impl IndexStore {
    /// Create a store whose first generation is `index`.
    pub fn new(index: FileIndex) -> Self {
        Self {
            current: RwLock::new(Published {
                index: Arc::new(index),
                generation: 0,
            }),
        }
    }

    /// Take a consistent point-in-time view of the index.
    pub fn snapshot(&self) -> Arc<FileIndex> {
        self.current.read().index.clone()
    }

    /// Replace the published index, returning the new generation number.
    pub fn publish(&self, index: FileIndex) -> u64 {
        let index = Arc::new(index);
        let mut current = self.current.write();
        current.index = index;
        current.generation += 1;
        current.generation
    }

    /// Number of times the index has been replaced since startup.
    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new(FileIndex::default())
    }
}

/// Decode `raw_path` and look it up in `index`.
///
/// Returns the decoded index key when present. This is the only gate between
/// a request and the filesystem: anything not in the index, including `..`
/// sequences and files with unlisted extensions, is reported as not found.
pub fn resolve(index: &FileIndex, raw_path: &str) -> Result<String> {
    let path = decode_request_path(raw_path)?;
    if index.contains(&path) {
        Ok(path)
    } else {
        Err(Error::not_found("file", path))
    }
}
