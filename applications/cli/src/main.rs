/// Songbox - download songs and keep them in a personal library
use clap::{Parser, Subcommand};
use songbox::{describe_event, open_library, run_shell, SongboxConfig};
use songbox_acquire::PipelineEvent;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "songbox")]
#[command(about = "Download songs from the web and keep them in a personal library", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./songbox.toml if present)
    #[arg(short, long, global = true, env = "SONGBOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a URL and add its audio to the library
    Download {
        /// Media URL
        #[arg(short, long)]
        url: String,
        /// File name to save under, without extension
        #[arg(short, long)]
        name: String,
        /// Target audio format
        #[arg(short, long, default_value = ".mp3")]
        format: String,
    },
    /// Add an audio file from disk to the library
    Import {
        /// Path of the audio file
        path: PathBuf,
    },
    /// List the songs in the library
    List {
        /// Print entries with their paths as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive shell; downloads run in the background
    Shell,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "songbox=info,songbox_acquire=info,songbox_library=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = SongboxConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Download { url, name, format } => {
            download(&config, &url, &name, &format).await?;
        }
        Commands::Import { path } => {
            import(&config, path).await?;
        }
        Commands::List { json } => {
            list(&config, json).await?;
        }
        Commands::Shell => {
            shell(&config).await?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn download(config: &SongboxConfig, url: &str, name: &str, format: &str) -> anyhow::Result<()> {
    let (library, mut events) = open_library(config).await?;
    let job_id = library.submit_download(url, name, format)?.id();

    while let Some(event) = events.recv().await {
        if event.job_id() != job_id {
            continue;
        }
        match event {
            PipelineEvent::Started { .. } => println!("{}", describe_event(&event)),
            PipelineEvent::SongAdded { .. } => {
                println!("{}", describe_event(&event));
                return Ok(());
            }
            PipelineEvent::Failed { error, .. } => return Err(error.into()),
        }
    }

    anyhow::bail!("Download ended without a result")
}

async fn import(config: &SongboxConfig, path: PathBuf) -> anyhow::Result<()> {
    let (library, _events) = open_library(config).await?;
    let entry = library.import_local(&path).await?;
    println!("Imported {}", entry.display_name);
    Ok(())
}

async fn list(config: &SongboxConfig, json: bool) -> anyhow::Result<()> {
    let (library, _events) = open_library(config).await?;

    if json {
        let entries = library.registry().entries().await;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for name in library.list_songs().await {
        println!("{}", name);
    }
    Ok(())
}

async fn shell(config: &SongboxConfig) -> anyhow::Result<()> {
    let (library, events) = open_library(config).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    run_shell(&library, events, stdin, tokio::io::stdout()).await
}
