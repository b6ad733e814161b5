//! Songbox Song Library
//!
//! The persisted registry of songs the user has added, either by importing a
//! local file or as the output of a download job.
//!
//! # Persistence format
//!
//! The registry is backed by a flat UTF-8 text file holding one absolute path
//! per line. The file is only ever appended to; the in-memory view is rebuilt
//! by replaying the whole file at startup and deriving each entry's display
//! name from the path's basename.
//!
//! # Example
//!
//! ```rust,no_run
//! use songbox_library::SongRegistry;
//!
//! # async fn demo() -> songbox_library::Result<()> {
//! let registry = SongRegistry::load("songlist.txt").await?;
//!
//! let entry = registry.add("/music/intro.mp3").await?;
//! assert_eq!(entry.display_name, "intro.mp3");
//!
//! let path = registry.lookup("intro.mp3").await?;
//! println!("{}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! A single `SongRegistry` instance is the only writer of its song list. Share
//! it as `Arc<SongRegistry>` between the download coordinator and the local
//! import path so that every mutation is serialized through it.

mod entry;
mod error;
pub mod registry;

pub use entry::LibraryEntry;
pub use error::{LibraryError, Result};
pub use registry::SongRegistry;
