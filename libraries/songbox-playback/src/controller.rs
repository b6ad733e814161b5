//! Playback controller
//!
//! Tracks which library entry is loaded and whether it is playing, and drives
//! a [`PlaybackBackend`] accordingly. A failing backend call leaves the
//! controller's state as it was before the call.

use crate::{
    backend::PlaybackBackend,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    types::PlaybackState,
};
use songbox_library::{LibraryEntry, LibraryError, SongRegistry};
use std::sync::Arc;
use tracing::{debug, info};

pub struct PlaybackController {
    registry: Arc<SongRegistry>,
    backend: Box<dyn PlaybackBackend>,

    // State
    state: PlaybackState,
    loaded: Option<LibraryEntry>,

    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    pub fn new(registry: Arc<SongRegistry>, backend: Box<dyn PlaybackBackend>) -> Self {
        Self {
            registry,
            backend,
            state: PlaybackState::Idle,
            loaded: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Load the entry named `display_name`
    ///
    /// Selecting the entry that is already loaded does nothing. Otherwise a
    /// playing or paused track is stopped first and the new entry is left
    /// loaded but stopped.
    pub async fn select(&mut self, display_name: &str) -> Result<()> {
        let entry = self
            .registry
            .get(display_name)
            .await
            .ok_or_else(|| LibraryError::NotFound(display_name.to_string()))?;

        if self.loaded.as_ref() == Some(&entry) {
            debug!("{} already loaded", entry.display_name);
            return Ok(());
        }

        if self.state.is_active() {
            self.backend.stop()?;
            self.set_state(PlaybackState::Stopped);
        }

        self.backend.load(&entry.path)?;
        info!("Loaded {}", entry.path.display());

        let previous = self
            .loaded
            .replace(entry.clone())
            .map(|old| old.display_name);
        self.pending_events.push(PlaybackEvent::TrackChanged {
            display_name: entry.display_name,
            previous,
        });
        self.set_state(PlaybackState::Stopped);
        Ok(())
    }

    /// Start, pause or resume depending on the current state
    pub fn play_pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Idle => Err(PlaybackError::NoTrackLoaded),
            PlaybackState::Stopped => {
                self.backend.play()?;
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            PlaybackState::Playing => {
                self.backend.pause()?;
                self.set_state(PlaybackState::Paused);
                Ok(())
            }
            PlaybackState::Paused => {
                self.backend.resume()?;
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
        }
    }

    /// Stop playback, keeping the entry loaded
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Idle => Err(PlaybackError::NoTrackLoaded),
            PlaybackState::Stopped => Ok(()),
            PlaybackState::Playing | PlaybackState::Paused => {
                self.backend.stop()?;
                self.set_state(PlaybackState::Stopped);
                Ok(())
            }
        }
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn loaded(&self) -> Option<&LibraryEntry> {
        self.loaded.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    // ===== Events =====

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.pending_events
                .push(PlaybackEvent::StateChanged { state });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    type Log = Mutex<Vec<String>>;

    struct LogBackend(Arc<Log>);

    impl PlaybackBackend for LogBackend {
        fn load(&mut self, path: &Path) -> Result<()> {
            self.push(format!("load {}", path.display()));
            Ok(())
        }
        fn play(&mut self) -> Result<()> {
            self.push("play".into());
            Ok(())
        }
        fn pause(&mut self) -> Result<()> {
            self.push("pause".into());
            Ok(())
        }
        fn resume(&mut self) -> Result<()> {
            self.push("resume".into());
            Ok(())
        }
        fn stop(&mut self) -> Result<()> {
            self.push("stop".into());
            Ok(())
        }
    }

    impl LogBackend {
        fn push(&self, call: String) {
            self.0.lock().unwrap().push(call);
        }
    }

    async fn controller_with_song(temp: &TempDir) -> (PlaybackController, Arc<Log>, PathBuf) {
        let song = temp.path().join("mysong.mp3");
        std::fs::write(&song, b"audio").unwrap();
        let registry = Arc::new(
            SongRegistry::load(temp.path().join("songlist.txt"))
                .await
                .unwrap(),
        );
        let entry = registry.add(&song).await.unwrap();
        let log = Arc::new(Log::default());
        let controller = PlaybackController::new(registry, Box::new(LogBackend(log.clone())));
        (controller, log, entry.path)
    }

    #[tokio::test]
    async fn starts_idle() {
        let temp = TempDir::new().unwrap();
        let (controller, _, _) = controller_with_song(&temp).await;

        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(controller.loaded().is_none());
        assert!(!controller.is_playing());
    }

    #[tokio::test]
    async fn play_pause_cycles_through_states() {
        let temp = TempDir::new().unwrap();
        let (mut controller, log, path) = controller_with_song(&temp).await;

        controller.select("mysong.mp3").await.unwrap();
        assert_eq!(controller.state(), PlaybackState::Stopped);

        controller.play_pause().unwrap();
        assert!(controller.is_playing());
        controller.play_pause().unwrap();
        assert_eq!(controller.state(), PlaybackState::Paused);
        controller.play_pause().unwrap();
        assert_eq!(controller.state(), PlaybackState::Playing);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                format!("load {}", path.display()),
                "play".to_string(),
                "pause".to_string(),
                "resume".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn play_pause_without_selection_fails() {
        let temp = TempDir::new().unwrap();
        let (mut controller, log, _) = controller_with_song(&temp).await;

        assert!(matches!(
            controller.play_pause(),
            Err(PlaybackError::NoTrackLoaded)
        ));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reselecting_loaded_entry_is_noop() {
        let temp = TempDir::new().unwrap();
        let (mut controller, log, _) = controller_with_song(&temp).await;

        controller.select("mysong.mp3").await.unwrap();
        controller.play_pause().unwrap();
        controller.select("mysong.mp3").await.unwrap();

        assert!(controller.is_playing());
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn events_track_transitions() {
        let temp = TempDir::new().unwrap();
        let (mut controller, _, _) = controller_with_song(&temp).await;

        controller.select("mysong.mp3").await.unwrap();
        controller.play_pause().unwrap();

        assert!(controller.has_pending_events());
        assert_eq!(
            controller.drain_events(),
            vec![
                PlaybackEvent::TrackChanged {
                    display_name: "mysong.mp3".to_string(),
                    previous: None,
                },
                PlaybackEvent::StateChanged {
                    state: PlaybackState::Stopped
                },
                PlaybackEvent::StateChanged {
                    state: PlaybackState::Playing
                },
            ]
        );
        assert!(!controller.has_pending_events());
    }
}
