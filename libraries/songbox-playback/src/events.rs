//! Playback events
//!
//! Queued by the controller on every transition so a UI can catch up with
//! [`PlaybackController::drain_events`](crate::PlaybackController::drain_events).

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged { state: PlaybackState },

    /// A different entry was loaded
    TrackChanged {
        /// Display name of the new entry
        display_name: String,
        /// Display name of the entry it replaced, if any
        previous: Option<String>,
    },
}
