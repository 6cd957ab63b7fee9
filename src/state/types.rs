use serde::Serialize;

/// Sorted, duplicate-free list of root-relative file paths.
///
/// Built once per scan and never mutated afterwards; a newer scan produces a
/// new `FileIndex` that replaces this one in the [`IndexStore`](super::IndexStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileIndex {
    files: Vec<String>,
}

impl FileIndex {
    /// Sort and deduplicate `files` into an index.
    pub fn from_unsorted(mut files: Vec<String>) -> Self {
        files.sort_unstable();
        files.dedup();
        Self { files }
    }

    /// Exact, byte-for-byte membership test.
    pub fn contains(&self, path: &str) -> bool {
        self.files
            .binary_search_by(|probe| probe.as_str().cmp(path))
            .is_ok()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
