//! Serve-Videos-Common: Shared types and utilities.
//!
//! This crate provides functionality used by both the scanner and the HTTP
//! layer of serve-videos:
//!
//! - **Error Handling**: A unified error type with HTTP status mapping
//! - **Path Utilities**: Extension matching, root-relative path rendering and
//!   request path decoding
//!
//! # Examples
//!
//! ```
//! use serve_videos_common::{ExtensionSet, Error, Result};
//!
//! let exts = ExtensionSet::default();
//! assert_eq!(exts.matching("show/episode.mkv"), Some("mkv"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("file", "missing.mp4"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod paths;

pub use error::{Error, Result};
pub use paths::ExtensionSet;
