//! minetunnel entry point.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "minetunnel", version)]
#[command(about = "Expose a Minecraft LAN world through a public tunnel")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minecraft log file to scan (overrides configuration).
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Public tunnel hostname (overrides configuration).
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the log and restart the tunnel whenever the LAN port changes.
    Watch {
        /// Poll interval in seconds (overrides configuration).
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Start the tunnel once, on a detected or explicit port.
    Start {
        /// Port to tunnel; bypasses log detection.
        #[arg(long)]
        port: Option<u16>,
        /// Do not copy the public address to the clipboard.
        #[arg(long)]
        no_clipboard: bool,
    },
    /// Terminate the tunnel process.
    Stop,
    /// Print the currently detected LAN port.
    Detect {
        /// Copy the port to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// Report whether the tunnel process is running.
    Status,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(log_file) = cli.log_file {
        config.log_file = log_file;
    }
    if let Some(host) = cli.host {
        config.public_host = host;
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match cli.cmd {
            Commands::Watch { interval } => commands::watch(config, interval).await,
            Commands::Start { port, no_clipboard } => {
                commands::start(config, port, no_clipboard).await
            }
            Commands::Stop => commands::stop(config).await,
            Commands::Detect { copy } => commands::detect(config, copy).await,
            Commands::Status => commands::status(config).await,
        }
    })
}
