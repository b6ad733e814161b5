//! One fetch + transcode job
//!
//! The pipeline never leaves the fetcher's intermediate file behind: it is
//! removed after the transcoder ran, whatever the outcome, and after a failed
//! fetch in case the tool left a partial download.

use crate::{
    tools::{Fetcher, Transcoder},
    AcquireConfig, AcquireError, AudioFormat, JobRequest, Result,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Extension of the fetcher's output file
pub const INTERMEDIATE_EXTENSION: &str = "mp4";

/// Check that a target name can be used as a song file name
///
/// The name must start with a word character (letter, digit or `_`) and must
/// be a single path component.
pub fn validate_target_name(name: &str) -> Result<()> {
    let starts_with_word = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');
    let single_component = !name.contains(['/', '\\']);

    if starts_with_word && single_component {
        Ok(())
    } else {
        Err(AcquireError::InvalidName(name.to_string()))
    }
}

/// Fetches a URL and converts it into an audio file in the library directory
pub struct AcquisitionPipeline {
    fetcher: Arc<dyn Fetcher>,
    transcoder: Arc<dyn Transcoder>,
    config: AcquireConfig,
}

impl AcquisitionPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        transcoder: Arc<dyn Transcoder>,
        config: AcquireConfig,
    ) -> Self {
        Self {
            fetcher,
            transcoder,
            config,
        }
    }

    pub fn config(&self) -> &AcquireConfig {
        &self.config
    }

    /// Path the fetcher writes to for `target_name`
    pub fn intermediate_path(&self, target_name: &str) -> PathBuf {
        self.config
            .staging_dir()
            .join(format!("{}.{}", target_name, INTERMEDIATE_EXTENSION))
    }

    /// Path of the finished audio file for `target_name`
    pub fn destination_path(&self, target_name: &str, format: AudioFormat) -> PathBuf {
        self.config
            .library_dir
            .join(format!("{}.{}", target_name, format.extension()))
    }

    /// Run one job to completion and return the finished audio file
    ///
    /// Blocks only on the two external tools. Errors are terminal: nothing is
    /// retried.
    pub async fn run(&self, request: &JobRequest) -> Result<PathBuf> {
        validate_target_name(&request.target_name)?;

        let intermediate = self.intermediate_path(&request.target_name);
        let destination = self.destination_path(&request.target_name, request.format);

        fs::create_dir_all(&self.config.library_dir).await?;
        fs::create_dir_all(self.config.staging_dir()).await?;

        // A file already sitting at the intermediate path is not ours to remove
        // unless the fetch succeeds and overwrites it
        let preexisting = fs::metadata(&intermediate).await.is_ok();

        info!("Fetching {} into {}", request.url, intermediate.display());
        let fetched = self.fetcher.fetch(&request.url, &intermediate).await;
        let failure = match fetched {
            Ok(status) if status.success() => None,
            Ok(status) => Some(status.to_string()),
            Err(e) => Some(e.to_string()),
        };
        if let Some(detail) = failure {
            if preexisting {
                debug!(
                    "Leaving {} in place, it existed before the fetch",
                    intermediate.display()
                );
            } else {
                discard_intermediate(&intermediate).await;
            }
            return Err(AcquireError::Fetch(detail));
        }

        info!(
            "Transcoding {} to {}",
            intermediate.display(),
            destination.display()
        );
        let transcoded = self
            .transcoder
            .transcode(&intermediate, &destination, request.format)
            .await;

        // Before reporting either outcome
        discard_intermediate(&intermediate).await;

        match transcoded {
            Ok(status) if status.success() => Ok(destination),
            Ok(status) => Err(AcquireError::Transcode(status.to_string())),
            Err(e) => Err(AcquireError::Transcode(e.to_string())),
        }
    }
}

impl AcquisitionPipeline {
    /// Remove whatever a job for `request` may have left in the staging directory
    ///
    /// For jobs that ended without reaching the pipeline's own cleanup.
    pub(crate) async fn discard_leftovers(&self, request: &JobRequest) {
        if validate_target_name(&request.target_name).is_ok() {
            discard_intermediate(&self.intermediate_path(&request.target_name)).await;
        }
    }
}

/// Best-effort removal; a failure here must not replace the job's own outcome
async fn discard_intermediate(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!("Removed intermediate file {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Failed to remove intermediate file {}: {}",
            path.display(),
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_word_names() {
        for name in ["mysong", "_hidden", "2024 mix", "Ünïcode", "song.remix", "a-b"] {
            assert!(validate_target_name(name).is_ok(), "{name:?} should be valid");
        }
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["", " leading", "-dash", ".hidden", "..", "a/b", "a\\b", "!"] {
            assert!(
                matches!(
                    validate_target_name(name),
                    Err(AcquireError::InvalidName(_))
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn paths_follow_config() {
        struct Never;

        #[async_trait::async_trait]
        impl Fetcher for Never {
            async fn fetch(&self, _: &str, _: &Path) -> std::io::Result<crate::ToolStatus> {
                unreachable!()
            }
        }

        #[async_trait::async_trait]
        impl Transcoder for Never {
            async fn transcode(
                &self,
                _: &Path,
                _: &Path,
                _: AudioFormat,
            ) -> std::io::Result<crate::ToolStatus> {
                unreachable!()
            }
        }

        let pipeline = AcquisitionPipeline::new(
            Arc::new(Never),
            Arc::new(Never),
            AcquireConfig::new("/lib").with_staging_dir("/stage"),
        );

        assert_eq!(
            pipeline.intermediate_path("mysong"),
            PathBuf::from("/stage/mysong.mp4")
        );
        assert_eq!(
            pipeline.destination_path("mysong", AudioFormat::Wav),
            PathBuf::from("/lib/mysong.wav")
        );
    }

    proptest! {
        #[test]
        fn names_starting_with_symbol_are_rejected(
            first in "[ !#$%&()*+,./:;<=>?@\\[\\]^`{|}~-]",
            rest in "[a-z0-9 ]{0,12}",
        ) {
            let name = format!("{first}{rest}");
            prop_assert!(validate_target_name(&name).is_err());
        }

        #[test]
        fn plain_word_names_are_accepted(name in "[A-Za-z0-9_][A-Za-z0-9_ .-]{0,24}") {
            prop_assert!(validate_target_name(&name).is_ok());
        }
    }
}
