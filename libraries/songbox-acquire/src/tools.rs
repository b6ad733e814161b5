//! External fetch and transcode tools
//!
//! The pipeline only cares whether a tool succeeded, so both seams report a
//! [`ToolStatus`] and nothing else. `CommandFetcher` and `FfmpegTranscoder`
//! run the real programs as subprocesses.

use crate::AudioFormat;
use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// How much of a failed tool's stderr goes into the debug log
const STDERR_TAIL_BYTES: usize = 2048;

/// Exit status of an external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    code: Option<i32>,
}

impl ToolStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status of a process that ended without an exit code (killed by a signal)
    pub fn terminated() -> Self {
        Self { code: None }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<ExitStatus> for ToolStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Retrieves a remote media resource into a local file
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` into `output`
    ///
    /// A successful status means `output` exists and holds convertible media.
    /// `Err` means the tool could not be run at all.
    async fn fetch(&self, url: &str, output: &Path) -> io::Result<ToolStatus>;
}

/// Converts a local media file into an audio file
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Extract the audio of `input` into `output` as `format`
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        format: AudioFormat,
    ) -> io::Result<ToolStatus>;
}

/// `youtube-dl`-compatible downloader run as a subprocess
///
/// Invoked as `program [extra_args..] -o <output> <url>`.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    program: PathBuf,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandFetcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            timeout: None,
        }
    }

    /// Arguments placed before the output and URL arguments
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kill the download if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Fetcher for CommandFetcher {
    async fn fetch(&self, url: &str, output: &Path) -> io::Result<ToolStatus> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.extra_args).arg("-o").arg(output).arg(url);
        run_tool(cmd, self.timeout).await
    }
}

/// FFmpeg audio extraction
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Codec arguments for each output format
    fn format_args(format: AudioFormat) -> &'static [&'static str] {
        match format {
            AudioFormat::Mp3 => &["-b:a", "320k", "-f", "mp3"],
            AudioFormat::Wav => &["-f", "wav", "-c:a", "pcm_s16le"],
            AudioFormat::Flac => &["-compression_level", "5", "-f", "flac"],
            AudioFormat::Ogg => &["-q:a", "8", "-f", "ogg", "-c:a", "libvorbis"],
            AudioFormat::Opus => &["-b:a", "192k", "-f", "opus", "-c:a", "libopus"],
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        format: AudioFormat,
    ) -> io::Result<ToolStatus> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-y") // Overwrite output file
            .arg("-i")
            .arg(input)
            .arg("-vn")
            .args(Self::format_args(format))
            .arg(output);
        run_tool(cmd, self.timeout).await
    }
}

/// Run a tool to completion, killing it if `timeout` elapses first
async fn run_tool(mut cmd: Command, timeout: Option<Duration>) -> io::Result<ToolStatus> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("Running {:?}", cmd.as_std());

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("timed out after {:?}", limit),
                )
            })??,
        None => cmd.output().await?,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail_start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
        let tail_start = (tail_start..stderr.len())
            .find(|&i| stderr.is_char_boundary(i))
            .unwrap_or(stderr.len());
        debug!(
            "{:?} failed with {}: {}",
            cmd.as_std().get_program(),
            output.status,
            &stderr[tail_start..]
        );
    }

    Ok(output.status.into())
}
