/// Wiring of the song library from configuration
use crate::config::SongboxConfig;
use songbox_acquire::{
    AcquisitionPipeline, CommandFetcher, FfmpegTranscoder, PipelineEvent, SongLibrary,
};
use songbox_library::SongRegistry;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Load the registry and build a library that runs the configured tools
pub async fn open_library(
    config: &SongboxConfig,
) -> anyhow::Result<(SongLibrary, mpsc::UnboundedReceiver<PipelineEvent>)> {
    let registry = SongRegistry::load(&config.library.songlist_path).await?;

    let timeout = config.tool_timeout();
    let fetcher = CommandFetcher::new(&config.tools.fetcher)
        .with_args(config.tools.fetcher_args.iter().cloned())
        .with_timeout(timeout);
    let transcoder = FfmpegTranscoder::new(&config.tools.ffmpeg).with_timeout(timeout);

    let pipeline = AcquisitionPipeline::new(
        Arc::new(fetcher),
        Arc::new(transcoder),
        config.acquire_config(),
    );

    Ok(SongLibrary::new(Arc::new(registry), pipeline))
}

/// One-line, user-facing rendering of a pipeline event
pub fn describe_event(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::Started { request, .. } => format!(
            "Downloading {} as {}{}",
            request.url, request.target_name, request.format
        ),
        PipelineEvent::SongAdded { entry, .. } => {
            format!("Download complete: {}", entry.display_name)
        }
        PipelineEvent::Failed { error, .. } => error.to_string(),
    }
}
