//! Songbox Command-Line Library
//!
//! Configuration, wiring and the interactive shell behind the `songbox`
//! binary. Exposed as a library so the shell can be driven from tests.

pub mod app;
pub mod config;
pub mod error;
pub mod shell;

// Re-export commonly used types for convenience
pub use app::{describe_event, open_library};
pub use config::SongboxConfig;
pub use error::{ConfigError, Result};
pub use shell::{run_shell, ShellCommand};
