//! Common types for media acquisition

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use crate::AcquireError;

/// Target audio format of a download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Flac,
    Ogg,
    Opus,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Flac,
        AudioFormat::Ogg,
        AudioFormat::Opus,
    ];

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Opus => "opus",
        }
    }

    /// Format matching a file's extension, if it is a supported audio file
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for AudioFormat {
    type Err = AcquireError;

    /// Accepts `".mp3"`, `"mp3"` and `"MP3"` alike
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.trim().trim_start_matches('.');
        AudioFormat::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
            .ok_or_else(|| AcquireError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Identifier of one download job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the caller asked for: fetch `url` and save it as `target_name` + format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub url: String,
    pub target_name: String,
    pub format: AudioFormat,
}

impl JobRequest {
    pub fn new(url: impl Into<String>, target_name: impl Into<String>, format: AudioFormat) -> Self {
        Self {
            url: url.into(),
            target_name: target_name.into(),
            format,
        }
    }
}

/// Where the pipeline puts its files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireConfig {
    /// Directory receiving finished audio files
    pub library_dir: PathBuf,

    /// Directory for the fetcher's intermediate download (defaults to `library_dir`)
    pub staging_dir: Option<PathBuf>,
}

impl AcquireConfig {
    pub fn new(library_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: library_dir.into(),
            staging_dir: None,
        }
    }

    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(staging_dir.into());
        self
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        self.staging_dir.as_deref().unwrap_or(&self.library_dir)
    }
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self::new("downloads")
    }
}
