//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use songbox_acquire::{
    AcquireConfig, AcquisitionPipeline, AudioFormat, Fetcher, PipelineEvent, ToolStatus,
    Transcoder,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Fetcher that writes a placeholder file and exits with a fixed code
#[derive(Default)]
pub struct FakeFetcher {
    exit_code: i32,
    writes_output: bool,
    panics: bool,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    /// Exits 0 after writing its output
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            exit_code: 0,
            writes_output: true,
            ..Self::default()
        })
    }

    /// Exits with `code` without writing anything
    pub fn failing(code: i32) -> Arc<Self> {
        Arc::new(Self {
            exit_code: code,
            ..Self::default()
        })
    }

    /// Leaves a partial download behind and exits with `code`
    pub fn failing_with_partial_output(code: i32) -> Arc<Self> {
        Arc::new(Self {
            exit_code: code,
            writes_output: true,
            ..Self::default()
        })
    }

    /// Succeeds, but only once `gate` is notified
    pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            exit_code: 0,
            writes_output: true,
            gate: Some(gate),
            ..Self::default()
        })
    }

    pub fn panicking() -> Arc<Self> {
        Arc::new(Self {
            panics: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str, output: &Path) -> io::Result<ToolStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        assert!(!self.panics, "fetcher blew up");
        if self.writes_output {
            tokio::fs::write(output, b"fake video data").await?;
        }
        Ok(ToolStatus::from_code(self.exit_code))
    }
}

/// Transcoder that checks its input exists and writes the output on success
pub struct FakeTranscoder {
    exit_code: i32,
    panics: bool,
    calls: AtomicUsize,
    inputs_seen: Mutex<Vec<(PathBuf, bool)>>,
}

impl FakeTranscoder {
    pub fn succeeding() -> Arc<Self> {
        Self::exiting(0)
    }

    pub fn failing(code: i32) -> Arc<Self> {
        Self::exiting(code)
    }

    /// Panics after recording its input
    pub fn panicking() -> Arc<Self> {
        Arc::new(Self {
            exit_code: 0,
            panics: true,
            calls: AtomicUsize::new(0),
            inputs_seen: Mutex::new(Vec::new()),
        })
    }

    fn exiting(exit_code: i32) -> Arc<Self> {
        Arc::new(Self {
            exit_code,
            panics: false,
            calls: AtomicUsize::new(0),
            inputs_seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Input paths with whether each existed when the transcoder ran
    pub fn inputs_seen(&self) -> Vec<(PathBuf, bool)> {
        self.inputs_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _format: AudioFormat,
    ) -> io::Result<ToolStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs_seen
            .lock()
            .unwrap()
            .push((input.to_path_buf(), input.exists()));
        assert!(!self.panics, "transcoder blew up");
        if self.exit_code == 0 {
            tokio::fs::write(output, b"fake audio data").await?;
        }
        Ok(ToolStatus::from_code(self.exit_code))
    }
}

pub fn pipeline(
    fetcher: &Arc<FakeFetcher>,
    transcoder: &Arc<FakeTranscoder>,
    library_dir: &Path,
) -> AcquisitionPipeline {
    AcquisitionPipeline::new(
        Arc::clone(fetcher) as Arc<dyn Fetcher>,
        Arc::clone(transcoder) as Arc<dyn Transcoder>,
        AcquireConfig::new(library_dir),
    )
}

/// Next event, failing the test instead of hanging
pub async fn next_event(events: &mut mpsc::UnboundedReceiver<PipelineEvent>) -> PipelineEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for pipeline event")
        .expect("event channel closed")
}
