//! Library entry type

use crate::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One song in the library
///
/// The display name is always the basename of `path`, so two entries with
/// the same basename cannot coexist in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// Name shown to the user and used as the lookup key
    pub display_name: String,

    /// Absolute path of the audio file
    pub path: PathBuf,
}

impl LibraryEntry {
    /// Build an entry from a path, deriving the display name from its basename
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let display_name = display_name_of(&path)?;
        Ok(Self { display_name, path })
    }
}

/// Basename of `path` as it is shown in the song list
pub(crate) fn display_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| LibraryError::InvalidPath(format!("{} has no file name", path.display())))
}
