//! comfylet CLI
//!
//! Command-line interface for provisioning model weights and querying
//! a running daemon.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// comfylet - provisioner and reverse proxy for ComfyUI containers
#[derive(Parser, Debug)]
#[command(name = "comfylet")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Daemon address
    #[arg(long, default_value = "http://localhost:8000", global = true)]
    api: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download model weights and link them into the ComfyUI tree
    Provision {
        /// Cache directory for downloaded weights
        #[arg(long, default_value = "/cache")]
        cache_dir: PathBuf,

        /// ComfyUI models directory
        #[arg(long, default_value = "/root/comfy/ComfyUI/models")]
        models_root: PathBuf,

        /// Abort on the first failed download instead of continuing
        #[arg(long)]
        abort_on_error: bool,
    },

    /// Query a running daemon's health endpoint
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match cli.command {
        Commands::Provision {
            cache_dir,
            models_root,
            abort_on_error,
        } => {
            commands::provision(cache_dir, models_root, abort_on_error).await?;
        }
        Commands::Health => {
            let client = commands::ApiClient::new(&cli.api);
            commands::health(&client).await?;
        }
    }

    Ok(())
}
