//! Audio output seam
//!
//! Decoding and output belong to the platform, the controller only tracks
//! state and drives the backend through this trait.

use crate::error::Result;
use std::path::Path;

/// Platform audio output
///
/// Implementors map their own failures to
/// [`PlaybackError::Backend`](crate::PlaybackError::Backend).
pub trait PlaybackBackend: Send {
    /// Prepare `path` for playback, replacing whatever was loaded
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Start the loaded track from the beginning
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Continue a paused track from where it stopped
    fn resume(&mut self) -> Result<()>;

    /// Stop output, keeping the track loaded
    fn stop(&mut self) -> Result<()>;
}
