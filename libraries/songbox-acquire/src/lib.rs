//! Songbox Media Acquisition
//!
//! This crate turns a media URL into a song in the library.
//!
//! # Features
//!
//! - Fetching remote media through an external downloader (`youtube-dl` by default)
//! - Extracting audio through an external transcoder (`ffmpeg` by default)
//! - Guaranteed cleanup of the intermediate download on every exit path
//! - Background execution with one terminal notification per job
//! - At most one download in flight per coordinator
//!
//! # Architecture
//!
//! - `tools`: `Fetcher`/`Transcoder` seams and their subprocess implementations
//! - `pipeline`: One fetch + transcode job, mapping tool failures to typed errors
//! - `coordinator`: Runs jobs on worker tasks and reports them over a channel
//! - `events`: Notification types and callback dispatch
//! - `service`: `SongLibrary`, the API the user interface talks to
//!
//! # Example
//!
//! ```rust,no_run
//! use songbox_acquire::{
//!     AcquireConfig, AcquisitionPipeline, CommandFetcher, FfmpegTranscoder, PipelineEvent,
//!     SongLibrary,
//! };
//! use songbox_library::SongRegistry;
//! use std::sync::Arc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let registry = Arc::new(SongRegistry::load("songlist.txt").await?);
//! let pipeline = AcquisitionPipeline::new(
//!     Arc::new(CommandFetcher::new("youtube-dl")),
//!     Arc::new(FfmpegTranscoder::new("ffmpeg")),
//!     AcquireConfig::default(),
//! );
//! let (library, mut events) = SongLibrary::new(registry, pipeline);
//!
//! library.submit_download("https://example.com/v", "mysong", ".mp3")?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         PipelineEvent::SongAdded { entry, .. } => println!("added {}", entry.display_name),
//!         PipelineEvent::Failed { error, .. } => eprintln!("{error}"),
//!         PipelineEvent::Started { .. } => continue,
//!     }
//!     break;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod types;

pub mod coordinator;
pub mod events;
pub mod pipeline;
pub mod service;
pub mod tools;

pub use coordinator::{JobHandle, PipelineCoordinator};
pub use error::AcquireError;
pub use events::{NotificationHandlers, PipelineEvent};
pub use pipeline::{validate_target_name, AcquisitionPipeline};
pub use service::SongLibrary;
pub use tools::{CommandFetcher, FfmpegTranscoder, Fetcher, ToolStatus, Transcoder};
pub use types::*;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, AcquireError>;
