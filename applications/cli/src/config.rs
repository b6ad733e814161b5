/// Songbox configuration
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use songbox_acquire::AcquireConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "songbox.toml";

/// Prefix of environment overrides, e.g. `SONGBOX_TOOLS__FFMPEG`
pub const ENV_PREFIX: &str = "SONGBOX";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SongboxConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_tools")]
    pub tools: ToolSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Persisted song list
    #[serde(default = "default_songlist_path")]
    pub songlist_path: PathBuf,

    /// Where finished downloads are written
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Where partial downloads live; `download_dir` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolSettings {
    /// Downloader program, invoked as `<fetcher> <fetcher_args..> -o <output> <url>`
    #[serde(default = "default_fetcher")]
    pub fetcher: String,

    #[serde(default)]
    pub fetcher_args: Vec<String>,

    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// Per-tool time limit in seconds, 0 for none
    #[serde(default)]
    pub timeout_secs: u64,
}

impl SongboxConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `songbox.toml` is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path.to_path_buf())),
            None => settings
                .add_source(config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables (prefixed with SONGBOX_)
        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tools.fetcher.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "tools.fetcher must name a program".to_string(),
            ));
        }

        if self.tools.ffmpeg.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "tools.ffmpeg must name a program".to_string(),
            ));
        }

        if self.library.songlist_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "library.songlist_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Time limit for each external tool, if any
    pub fn tool_timeout(&self) -> Option<Duration> {
        match self.tools.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Directories handed to the acquisition pipeline
    pub fn acquire_config(&self) -> AcquireConfig {
        let config = AcquireConfig::new(&self.library.download_dir);
        match &self.library.staging_dir {
            Some(staging) => config.with_staging_dir(staging),
            None => config,
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(" ")
        .with_list_parse_key("tools.fetcher_args")
        .try_parsing(true)
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        songlist_path: default_songlist_path(),
        download_dir: default_download_dir(),
        staging_dir: None,
    }
}

fn default_songlist_path() -> PathBuf {
    PathBuf::from("songlist.txt")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_tools() -> ToolSettings {
    ToolSettings {
        fetcher: default_fetcher(),
        fetcher_args: Vec::new(),
        ffmpeg: default_ffmpeg(),
        timeout_secs: 0,
    }
}

fn default_fetcher() -> String {
    "youtube-dl".to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

impl Default for SongboxConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            tools: default_tools(),
        }
    }
}
