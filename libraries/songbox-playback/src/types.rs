//! Core types for playback control

use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track selected
    #[default]
    Idle,

    /// Track loaded, not playing
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

impl PlaybackState {
    /// Whether the backend holds a started track (playing or paused)
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}
