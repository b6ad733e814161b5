//! Error types for playback control

use songbox_library::LibraryError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Nothing has been selected yet
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The audio backend refused an operation
    #[error("Playback backend error: {0}")]
    Backend(String),

    /// The selected name could not be resolved
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
