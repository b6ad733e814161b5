//! Persisted song registry
//!
//! Keeps the ordered in-memory view of the library and the append-only song
//! list on disk in step. All mutation goes through [`SongRegistry::add`],
//! which holds the registry lock across the file append and the in-memory
//! update.

use crate::{LibraryEntry, LibraryError, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Ordered, name-keyed song library backed by an append-only song list
#[derive(Debug)]
pub struct SongRegistry {
    songlist_path: PathBuf,
    state: Mutex<RegistryState>,
}

#[derive(Debug)]
struct RegistryState {
    entries: Vec<LibraryEntry>,
    index: HashMap<String, usize>,
    file: File,
    /// Song list is non-empty and does not end in a newline
    needs_separator: bool,
}

impl RegistryState {
    /// Insert an entry, moving an existing entry with the same name to the end
    fn insert(&mut self, entry: LibraryEntry) {
        if let Some(old) = self.index.remove(&entry.display_name) {
            self.entries.remove(old);
            for (i, shifted) in self.entries.iter().enumerate().skip(old) {
                self.index.insert(shifted.display_name.clone(), i);
            }
        }
        self.index
            .insert(entry.display_name.clone(), self.entries.len());
        self.entries.push(entry);
    }
}

impl SongRegistry {
    /// Load the registry from `songlist_path`
    ///
    /// A missing song list is created empty. Blank lines are ignored. Fails
    /// only when the song list or its directory cannot be accessed.
    pub async fn load(songlist_path: impl Into<PathBuf>) -> Result<Self> {
        let songlist_path = songlist_path.into();

        if let Some(parent) = songlist_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| LibraryError::persistence(parent, e))?;
            }
        }

        let content = match fs::read(&songlist_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Song list {} does not exist, creating it", songlist_path.display());
                Vec::new()
            }
            Err(e) => return Err(LibraryError::persistence(&songlist_path, e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&songlist_path)
            .await
            .map_err(|e| LibraryError::persistence(&songlist_path, e))?;

        let mut state = RegistryState {
            entries: Vec::new(),
            index: HashMap::new(),
            file,
            needs_separator: !content.is_empty() && !content.ends_with(b"\n"),
        };

        for raw in content.split(|&b| b == b'\n') {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let Ok(line) = std::str::from_utf8(raw) else {
                debug!(
                    "Skipping song list line that is not UTF-8: {:?}",
                    String::from_utf8_lossy(raw)
                );
                continue;
            };
            // Paths are kept exactly as written; surrounding spaces belong to the file name
            if line.trim().is_empty() {
                continue;
            }
            match LibraryEntry::from_path(line) {
                Ok(entry) => state.insert(entry),
                Err(e) => debug!("Skipping song list line {:?}: {}", line, e),
            }
        }

        info!(
            "Loaded {} songs from {}",
            state.entries.len(),
            songlist_path.display()
        );

        Ok(Self {
            songlist_path,
            state: Mutex::new(state),
        })
    }

    /// Add an existing audio file to the library
    ///
    /// The path is canonicalized, appended to the song list as one line and
    /// then added to the in-memory view. A song with the same display name is
    /// replaced and moves to the end of the list.
    pub async fn add(&self, path: impl AsRef<Path>) -> Result<LibraryEntry> {
        let path = path.as_ref();

        let canonical = fs::canonicalize(path)
            .await
            .map_err(|_| LibraryError::MissingFile(path.to_path_buf()))?;
        let metadata = fs::metadata(&canonical)
            .await
            .map_err(|_| LibraryError::MissingFile(path.to_path_buf()))?;
        if !metadata.is_file() {
            return Err(LibraryError::MissingFile(path.to_path_buf()));
        }

        let line = canonical
            .to_str()
            .filter(|s| !s.contains(['\n', '\r']))
            .ok_or_else(|| {
                LibraryError::InvalidPath(format!(
                    "{} cannot be stored in the song list",
                    canonical.display()
                ))
            })?
            .to_string();

        let entry = LibraryEntry::from_path(canonical)?;

        let mut state = self.state.lock().await;

        let mut record = String::with_capacity(line.len() + 2);
        if state.needs_separator {
            record.push('\n');
        }
        record.push_str(&line);
        record.push('\n');

        // A failed append may leave a partial line behind
        state.needs_separator = true;
        self.append(&mut state.file, record.as_bytes()).await?;
        state.needs_separator = false;
        state.insert(entry.clone());

        info!("Added {} to library", entry.display_name);
        Ok(entry)
    }

    async fn append(&self, file: &mut File, record: &[u8]) -> Result<()> {
        let persist = |e| LibraryError::persistence(&self.songlist_path, e);
        file.write_all(record).await.map_err(persist)?;
        file.flush().await.map_err(persist)?;
        file.sync_data().await.map_err(persist)?;
        Ok(())
    }

    /// Resolve a display name to its file path
    pub async fn lookup(&self, display_name: &str) -> Result<PathBuf> {
        self.get(display_name)
            .await
            .map(|entry| entry.path)
            .ok_or_else(|| LibraryError::NotFound(display_name.to_string()))
    }

    /// Get the entry with this display name, if any
    pub async fn get(&self, display_name: &str) -> Option<LibraryEntry> {
        let state = self.state.lock().await;
        state
            .index
            .get(display_name)
            .map(|&i| state.entries[i].clone())
    }

    /// All entries in display order
    pub async fn entries(&self) -> Vec<LibraryEntry> {
        self.state.lock().await.entries.clone()
    }

    /// Display names in display order
    pub async fn display_names(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .map(|entry| entry.display_name.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Location of the persisted song list
    pub fn songlist_path(&self) -> &Path {
        &self.songlist_path
    }
}
