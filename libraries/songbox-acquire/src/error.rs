//! Error types for media acquisition

use songbox_library::LibraryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquireError {
    /// Target name rejected before any tool ran
    #[error("Invalid name for saving song: {0:?}")]
    InvalidName(String),

    /// The fetcher exited non-zero, could not start, or timed out
    #[error("Error downloading. URL may be invalid or copyrighted. ({0})")]
    Fetch(String),

    /// The transcoder exited non-zero, could not start, or timed out
    #[error("Error ripping audio. ({0})")]
    Transcode(String),

    /// A job is already in flight on this coordinator
    #[error("A download is already in progress")]
    Busy,

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The worker task ended without reporting an outcome
    #[error("Download stopped unexpectedly: {0}")]
    Interrupted(String),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
