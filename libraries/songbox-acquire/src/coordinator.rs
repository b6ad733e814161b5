//! Background execution of download jobs
//!
//! The coordinator accepts at most one job at a time, runs it on a tokio task
//! and reports it on a single channel. Waiting on the external tools happens
//! only inside that task, so the caller is never blocked.

use crate::{
    AcquireError, AcquisitionPipeline, AudioFormat, JobId, JobRequest, PipelineEvent, Result,
};
use songbox_library::{LibraryEntry, SongRegistry};
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Handle to an accepted job
///
/// Dropping the handle does not cancel the job.
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    task: JoinHandle<()>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the job's terminal event has been sent
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("Job {} task failed: {}", self.id, e);
        }
    }
}

/// Runs acquisition jobs off the caller's task, one at a time
pub struct PipelineCoordinator {
    pipeline: Arc<AcquisitionPipeline>,
    registry: Arc<SongRegistry>,
    in_flight: Arc<Semaphore>,
    events: mpsc::UnboundedSender<PipelineEvent>,
}

impl PipelineCoordinator {
    /// Create a coordinator and the receiving end of its notification channel
    pub fn new(
        pipeline: Arc<AcquisitionPipeline>,
        registry: Arc<SongRegistry>,
    ) -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            pipeline,
            registry,
            in_flight: Arc::new(Semaphore::new(1)),
            events,
        };
        (coordinator, rx)
    }

    /// Accept a job and start it in the background
    ///
    /// Fails with [`AcquireError::Busy`] while another job is in flight; the
    /// rejected job is not queued. Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        url: impl Into<String>,
        target_name: impl Into<String>,
        format: AudioFormat,
    ) -> Result<JobHandle> {
        let permit = Arc::clone(&self.in_flight)
            .try_acquire_owned()
            .map_err(|_| AcquireError::Busy)?;

        let id = JobId::new();
        let request = JobRequest::new(url, target_name, format);
        info!(
            "Accepted job {}: {} -> {}{}",
            id, request.url, request.target_name, request.format
        );

        // Sent before the worker exists, so it always precedes the terminal event
        let _ = self.events.send(PipelineEvent::Started {
            job_id: id,
            request: request.clone(),
        });

        let task = tokio::spawn(run_job(
            id,
            request,
            Arc::clone(&self.pipeline),
            Arc::clone(&self.registry),
            self.events.clone(),
            permit,
        ));

        Ok(JobHandle { id, task })
    }

    /// Whether a job is currently in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight.available_permits() == 0
    }

    pub fn registry(&self) -> &Arc<SongRegistry> {
        &self.registry
    }
}

async fn run_job(
    id: JobId,
    request: JobRequest,
    pipeline: Arc<AcquisitionPipeline>,
    registry: Arc<SongRegistry>,
    events: mpsc::UnboundedSender<PipelineEvent>,
    permit: OwnedSemaphorePermit,
) {
    // Nested task so that a panic inside a tool still ends in a terminal event
    let work = {
        let request = request.clone();
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move { acquire(&request, &pipeline, &registry).await })
    };
    let outcome = match work.await {
        Ok(outcome) => outcome,
        Err(e) => {
            pipeline.discard_leftovers(&request).await;
            Err(AcquireError::Interrupted(e.to_string()))
        }
    };

    // Free the coordinator before the caller hears about it
    drop(permit);

    let event = match outcome {
        Ok(entry) => {
            info!("Job {} finished: {}", id, entry.path.display());
            PipelineEvent::SongAdded { job_id: id, entry }
        }
        Err(error) => {
            warn!("Job {} failed: {}", id, error);
            PipelineEvent::Failed { job_id: id, error }
        }
    };

    if events.send(event).is_err() {
        debug!("Job {} finished after its listener went away", id);
    }
}

/// Run the pipeline and register its output
async fn acquire(
    request: &JobRequest,
    pipeline: &AcquisitionPipeline,
    registry: &SongRegistry,
) -> Result<LibraryEntry> {
    let path = pipeline.run(request).await?;
    Ok(registry.add(&path).await?)
}
