//! Songbox - Playback Control
//!
//! Tracks which library entry is loaded and whether it is playing.
//!
//! This crate does not decode or output audio. The platform supplies a
//! [`PlaybackBackend`] and the [`PlaybackController`] drives it:
//!
//! | State     | `play_pause()`        | `stop()`         |
//! |-----------|-----------------------|------------------|
//! | `Idle`    | `NoTrackLoaded`       | `NoTrackLoaded`  |
//! | `Stopped` | `play` → `Playing`    | no-op            |
//! | `Playing` | `pause` → `Paused`    | `stop` → `Stopped` |
//! | `Paused`  | `resume` → `Playing`  | `stop` → `Stopped` |
//!
//! `select(name)` resolves the name through the shared
//! [`SongRegistry`](songbox_library::SongRegistry) and leaves the new entry
//! loaded in `Stopped`.
//!
//! # Example
//!
//! ```rust,no_run
//! use songbox_library::SongRegistry;
//! use songbox_playback::{PlaybackBackend, PlaybackController, Result};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Silent;
//!
//! impl PlaybackBackend for Silent {
//!     fn load(&mut self, _path: &Path) -> Result<()> { Ok(()) }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) -> Result<()> { Ok(()) }
//!     fn resume(&mut self) -> Result<()> { Ok(()) }
//!     fn stop(&mut self) -> Result<()> { Ok(()) }
//! }
//!
//! # async fn demo() -> Result<()> {
//! let registry = Arc::new(SongRegistry::load("songlist.txt").await?);
//! let mut controller = PlaybackController::new(registry, Box::new(Silent));
//!
//! controller.select("mysong.mp3").await?;
//! controller.play_pause()?; // playing
//! controller.play_pause()?; // paused
//! # Ok(())
//! # }
//! ```

mod backend;
mod controller;
mod error;
pub mod events;
pub mod types;

// Public exports
pub use backend::PlaybackBackend;
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use types::PlaybackState;
