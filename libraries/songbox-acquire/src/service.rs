//! Caller-facing library API
//!
//! `SongLibrary` is what a user interface holds: it owns the download
//! coordinator and shares the registry with it, so local imports and finished
//! downloads go through the same registry instance.

use crate::{
    AcquireError, AcquisitionPipeline, AudioFormat, JobHandle, PipelineCoordinator,
    PipelineEvent, Result,
};
use songbox_library::{LibraryEntry, SongRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

pub struct SongLibrary {
    registry: Arc<SongRegistry>,
    coordinator: PipelineCoordinator,
}

impl SongLibrary {
    /// Create the library and the receiver for its download events
    pub fn new(
        registry: Arc<SongRegistry>,
        pipeline: AcquisitionPipeline,
    ) -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (coordinator, events) =
            PipelineCoordinator::new(Arc::new(pipeline), Arc::clone(&registry));
        (
            Self {
                registry,
                coordinator,
            },
            events,
        )
    }

    /// Download `url` and save its audio as `name` + `format_extension`
    ///
    /// `format_extension` is an extension such as `".mp3"` or `"wav"`.
    pub fn submit_download(
        &self,
        url: &str,
        name: &str,
        format_extension: &str,
    ) -> Result<JobHandle> {
        let format: AudioFormat = format_extension.parse()?;
        self.coordinator.submit(url, name, format)
    }

    /// Add an audio file that is already on disk
    pub async fn import_local(&self, path: impl AsRef<Path>) -> Result<LibraryEntry> {
        let path = path.as_ref();
        if AudioFormat::from_path(path).is_none() {
            return Err(AcquireError::UnsupportedFormat(path.display().to_string()));
        }

        let entry = self.registry.add(path).await?;
        info!("Imported {}", entry.path.display());
        Ok(entry)
    }

    /// Display names in library order
    pub async fn list_songs(&self) -> Vec<String> {
        self.registry.display_names().await
    }

    pub async fn lookup(&self, display_name: &str) -> Result<PathBuf> {
        Ok(self.registry.lookup(display_name).await?)
    }

    /// Whether a download is in flight
    pub fn is_busy(&self) -> bool {
        self.coordinator.is_busy()
    }

    pub fn registry(&self) -> &Arc<SongRegistry> {
        &self.registry
    }
}
