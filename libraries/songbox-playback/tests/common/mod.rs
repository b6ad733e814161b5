//! Common test utilities and fixtures
#![allow(dead_code)]

use songbox_library::SongRegistry;
use songbox_playback::{PlaybackBackend, PlaybackError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Backend call, as recorded by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Resume,
    Stop,
}

impl Call {
    fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
        }
    }
}

/// Shared view of what a [`RecordingBackend`] was asked to do
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    failing: Arc<Mutex<HashSet<&'static str>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Make every later call of `kind` ("load", "play", ...) fail
    pub fn fail(&self, kind: &'static str) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn backend(&self) -> Box<dyn PlaybackBackend> {
        Box::new(RecordingBackend(self.clone()))
    }
}

/// Backend that records successful calls and fails on demand
pub struct RecordingBackend(Recorder);

impl RecordingBackend {
    fn record(&mut self, call: Call) -> Result<()> {
        if self.0.failing.lock().unwrap().contains(call.kind()) {
            return Err(PlaybackError::Backend(format!("{} refused", call.kind())));
        }
        self.0.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl PlaybackBackend for RecordingBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.record(Call::Load(path.to_path_buf()))
    }

    fn play(&mut self) -> Result<()> {
        self.record(Call::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.record(Call::Pause)
    }

    fn resume(&mut self) -> Result<()> {
        self.record(Call::Resume)
    }

    fn stop(&mut self) -> Result<()> {
        self.record(Call::Stop)
    }
}

/// Registry in `dir` holding one file per name, in order
pub async fn registry_with(dir: &Path, names: &[&str]) -> Arc<SongRegistry> {
    let registry = SongRegistry::load(dir.join("songlist.txt")).await.unwrap();
    for name in names {
        let path = dir.join(name);
        std::fs::write(&path, b"audio").unwrap();
        registry.add(&path).await.unwrap();
    }
    Arc::new(registry)
}
