//! Common error types used throughout serve-videos.
//!
//! Scanner, watcher and HTTP handlers all funnel their failures into
//! [`Error`], which carries enough context for the HTTP layer to derive a
//! status code via [`Error::http_status`].

use std::fmt;
use std::path::PathBuf;

/// Common error type for serve-videos.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity is not part of the published index.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "file").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A request path could not be decoded.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Startup configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The filesystem watch subsystem could not be initialized.
    #[error("Watch error for {path}: {source}")]
    Watch {
        /// The directory the watcher was created for.
        path: PathBuf,
        /// The underlying watcher error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    ///
    /// Decode failures are reported as 404 rather than 400 so that a client
    /// cannot distinguish a malformed path from an unindexed one.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::InvalidPath(_) => 404,
            Error::Config(_) => 500,
            Error::Watch { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::InvalidPath`].
    pub fn invalid_path<S: Into<String>>(msg: S) -> Self {
        Error::InvalidPath(msg.into())
    }

    /// Convenience constructor for [`Error::Config`].
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Convenience constructor for [`Error::Watch`].
    pub fn watch(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Watch {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Internal`].
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
