//! Interactive shell
//!
//! Reads commands line by line while printing pipeline events as they arrive,
//! so a running download never blocks the prompt.

use crate::app::describe_event;
use songbox_acquire::{JobId, PipelineEvent, SongLibrary};
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::debug;

const HELP: &str = "\
Commands:
  download <url> <name> [format]   fetch a URL and save its audio as <name><format> (default .mp3)
  import <path>                    add an audio file from disk
  list                             show the library
  help                             show this message
  quit                             leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Download {
        url: String,
        name: String,
        format: Option<String>,
    },
    Import(PathBuf),
    List,
    Help,
    Quit,
    /// Blank line
    Nothing,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => Ok(Self::Nothing),
            "download" | "dl" => {
                let args: Vec<&str> = rest.split_whitespace().collect();
                match args.as_slice() {
                    [url, name] => Ok(Self::Download {
                        url: (*url).to_string(),
                        name: (*name).to_string(),
                        format: None,
                    }),
                    [url, name, format] => Ok(Self::Download {
                        url: (*url).to_string(),
                        name: (*name).to_string(),
                        format: Some((*format).to_string()),
                    }),
                    _ => Err("Usage: download <url> <name> [format]".to_string()),
                }
            }
            "import" if rest.is_empty() => Err("Usage: import <path>".to_string()),
            "import" => Ok(Self::Import(PathBuf::from(rest))),
            "list" | "ls" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!(
                "Unknown command: {other}. Type 'help' for a list of commands."
            )),
        }
    }
}

/// Run the shell until `quit` or end of input
///
/// A download still in flight at that point is waited for, so its outcome is
/// always printed.
pub async fn run_shell<R, W>(
    library: &SongLibrary,
    mut events: mpsc::UnboundedReceiver<PipelineEvent>,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut pending: Option<JobId> = None;

    say(&mut output, "Type 'help' for a list of commands.").await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("End of input");
                    break;
                };
                match line.parse::<ShellCommand>() {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => execute(library, command, &mut output, &mut pending).await?,
                    Err(message) => say(&mut output, &message).await?,
                }
            }
            Some(event) = events.recv() => {
                report(&event, &mut output, &mut pending).await?;
            }
        }
    }

    if pending.is_some() {
        say(&mut output, "Waiting for the current download to finish...").await?;
        while pending.is_some() {
            let Some(event) = events.recv().await else {
                break;
            };
            report(&event, &mut output, &mut pending).await?;
        }
    }

    Ok(())
}

async fn execute<W>(
    library: &SongLibrary,
    command: ShellCommand,
    output: &mut W,
    pending: &mut Option<JobId>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match command {
        ShellCommand::Download { url, name, format } => {
            let format = format.as_deref().unwrap_or(".mp3");
            match library.submit_download(&url, &name, format) {
                Ok(handle) => *pending = Some(handle.id()),
                Err(e) => say(output, &e.to_string()).await?,
            }
        }
        ShellCommand::Import(path) => match library.import_local(&path).await {
            Ok(entry) => say(output, &format!("Imported {}", entry.display_name)).await?,
            Err(e) => say(output, &e.to_string()).await?,
        },
        ShellCommand::List => {
            let songs = library.list_songs().await;
            if songs.is_empty() {
                say(output, "Library is empty").await?;
            }
            for (i, name) in songs.iter().enumerate() {
                say(output, &format!("{:>3}. {}", i + 1, name)).await?;
            }
        }
        ShellCommand::Help => say(output, HELP).await?,
        ShellCommand::Quit | ShellCommand::Nothing => {}
    }
    Ok(())
}

async fn report<W>(
    event: &PipelineEvent,
    output: &mut W,
    pending: &mut Option<JobId>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if event.is_terminal() && *pending == Some(event.job_id()) {
        *pending = None;
    }
    say(output, &describe_event(event)).await
}

async fn say<W>(output: &mut W, message: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(message.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
