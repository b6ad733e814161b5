//! Pipeline notifications
//!
//! Every accepted job produces exactly two events on the coordinator's
//! channel, in this order:
//! - `Started` when the job is accepted
//! - `SongAdded` or `Failed` once it reached a terminal state

use crate::{AcquireError, JobId, JobRequest};
use songbox_library::LibraryEntry;
use tokio::sync::mpsc;

/// Events emitted by the pipeline coordinator
#[derive(Debug)]
pub enum PipelineEvent {
    /// Job accepted and handed to a worker
    Started { job_id: JobId, request: JobRequest },

    /// Job finished and its song is already in the registry
    SongAdded { job_id: JobId, entry: LibraryEntry },

    /// Job failed; nothing was added to the registry
    Failed { job_id: JobId, error: AcquireError },
}

impl PipelineEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            PipelineEvent::Started { job_id, .. }
            | PipelineEvent::SongAdded { job_id, .. }
            | PipelineEvent::Failed { job_id, .. } => *job_id,
        }
    }

    /// Whether this is the last event of its job
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineEvent::Started { .. })
    }
}

pub type StartedCallback = Box<dyn FnMut(JobId, &JobRequest) + Send>;
pub type CompleteCallback = Box<dyn FnMut(JobId, &LibraryEntry) + Send>;
pub type ErrorCallback = Box<dyn FnMut(JobId, &AcquireError) + Send>;

/// Callback-style consumer of pipeline events
///
/// ```rust
/// use songbox_acquire::NotificationHandlers;
///
/// let handlers = NotificationHandlers::new()
///     .on_complete(|_, entry| println!("Download complete: {}", entry.display_name))
///     .on_error(|_, error| eprintln!("{error}"));
/// ```
#[derive(Default)]
pub struct NotificationHandlers {
    on_started: Option<StartedCallback>,
    on_complete: Option<CompleteCallback>,
    on_error: Option<ErrorCallback>,
}

impl NotificationHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_started(mut self, handler: impl FnMut(JobId, &JobRequest) + Send + 'static) -> Self {
        self.on_started = Some(Box::new(handler));
        self
    }

    pub fn on_complete(
        mut self,
        handler: impl FnMut(JobId, &LibraryEntry) + Send + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl FnMut(JobId, &AcquireError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// Route one event to its handler
    pub fn dispatch(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Started { job_id, request } => {
                if let Some(handler) = self.on_started.as_mut() {
                    handler(*job_id, request);
                }
            }
            PipelineEvent::SongAdded { job_id, entry } => {
                if let Some(handler) = self.on_complete.as_mut() {
                    handler(*job_id, entry);
                }
            }
            PipelineEvent::Failed { job_id, error } => {
                if let Some(handler) = self.on_error.as_mut() {
                    handler(*job_id, error);
                }
            }
        }
    }

    /// Dispatch events until the coordinator is dropped
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<PipelineEvent>) {
        while let Some(event) = events.recv().await {
            self.dispatch(&event);
        }
    }
}
