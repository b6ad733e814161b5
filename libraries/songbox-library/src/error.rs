//! Error types for the song library

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// No entry with this display name
    #[error("Song not found: {0}")]
    NotFound(String),

    /// The path does not name an existing regular file
    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    /// The song list (or its directory) cannot be read or written
    #[error("Song list {} is not accessible: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path cannot be stored as a single UTF-8 line
    #[error("Invalid file path: {0}")]
    InvalidPath(String),
}

impl LibraryError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
