//! Bonsai front binary entry point.
//!
//! Serves the page routes over HTTP, or imports a media file into the store.

use anyhow::{Context, Result};
use bonsai_front::application_service::media_import_service::MediaImportRequest;
use bonsai_front::config::{load_config, overlay_path, DEFAULT_CONFIG_FILE};
use bonsai_front::BonsaiSite;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bonsai CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "bonsai-front")]
#[command(about = "Bonsai - family wiki front pages")]
struct Args {
    /// Configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// HTTP API listen address (overrides the config file).
    #[arg(short = 'l', long)]
    listen: Option<SocketAddr>,

    /// Data directory for persistence (overrides the config file).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a media file and attach it to pages.
    ImportMedia {
        /// Path of the file to import.
        path: PathBuf,

        /// MIME type of the file.
        #[arg(long)]
        mime: String,

        /// Media title.
        #[arg(long, default_value = "")]
        title: String,

        /// Page the media depicts (repeatable).
        #[arg(long = "page")]
        pages: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(level) = args.log_level {
        config.log.level = level;
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .init();

    tracing::info!("Environment: {}", config.environment);
    let overlay = overlay_path(&args.config, config.environment);
    if overlay.exists() {
        tracing::info!("Config overlay: {}", overlay.display());
    }
    tracing::info!("Data directory: {:?}", config.storage.data_dir);

    let site = BonsaiSite::new(config)
        .await
        .context("Failed to create site")?;

    match args.command {
        Some(Command::ImportMedia {
            path,
            mime,
            title,
            pages,
        }) => {
            let media = site
                .media_import()
                .import(MediaImportRequest {
                    path,
                    mime_type: mime,
                    title,
                    pages,
                })
                .await?;
            println!("{}", media.key);
        }
        None => site.run().await?,
    }

    Ok(())
}
