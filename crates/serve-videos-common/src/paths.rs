//! Path utilities for extension filtering and request path handling.
//!
//! The scanner uses [`ExtensionSet`] and [`relative_path`] to decide which
//! files enter the index and under which name; the HTTP layer uses
//! [`decode_request_path`] to turn a URL path back into an index key.

use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Extensions served when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["m3u8", "mkv", "mp4", "ts"];

/// Ordered list of case-sensitive file name suffixes.
///
/// Matching is a plain suffix test on the root-relative path, with no dot
/// inserted: `ts` matches `clip.ts` and also `parts`.
///
/// # Examples
///
/// ```
/// use serve_videos_common::ExtensionSet;
///
/// let exts = ExtensionSet::new(["mp4", "MP4"]);
/// assert_eq!(exts.matching("a.mp4"), Some("mp4"));
/// assert_eq!(exts.matching("A.MP4"), Some("MP4"));
/// assert_eq!(exts.matching("a.Mp4"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionSet(Vec<String>);

impl ExtensionSet {
    /// Build a set from any list of suffixes, keeping their order.
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(exts.into_iter().map(Into::into).collect())
    }

    /// Return the first configured suffix that `path` ends with.
    pub fn matching(&self, path: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|ext| path.ends_with(ext.as_str()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(exts: Vec<String>) -> Self {
        Self(exts)
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Render `path` relative to `root` with `/` separators.
///
/// Returns `None` when `path` is not under `root`, is `root` itself, or has a
/// component that is not valid UTF-8 (such a name could never be requested
/// through a decoded URL).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use serve_videos_common::paths::relative_path;
///
/// let rel = relative_path(Path::new("/media"), Path::new("/media/show/e01.mkv"));
/// assert_eq!(rel.as_deref(), Some("show/e01.mkv"));
/// assert_eq!(relative_path(Path::new("/media"), Path::new("/media")), None);
/// ```
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Percent-decode a request path into an index key.
///
/// Every `%` must introduce two hex digits and the decoded bytes must be
/// valid UTF-8; anything else is an [`Error::InvalidPath`]. `+` is kept as
/// is since this is a path, not a query string.
///
/// # Examples
///
/// ```
/// use serve_videos_common::paths::decode_request_path;
///
/// assert_eq!(decode_request_path("my%20show/e01.mkv").unwrap(), "my show/e01.mkv");
/// assert!(decode_request_path("bad%zz.mp4").is_err());
/// ```
pub fn decode_request_path(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(Error::invalid_path(raw));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| Error::invalid_path(raw))
}
