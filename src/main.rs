//! MediaMeta CLI
//!
//! Prints normalized metadata records for audio/video, image and PDF files and
//! writes bounded thumbnails for them.
//!
//! # Usage
//!
//! ```bash
//! mediameta info movie.mp4
//! mediameta info scan.pdf --format yaml
//! mediameta thumbnail photo.jpg --output-dir thumbs --size 320x180 --background 255,255,255,0
//! mediameta thumbnails movie.mkv --output-dir thumbs
//! mediameta scan ./media --output-dir thumbs --thumbnails
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mediameta_cli::cli::{commands, Cli};
use mediameta_cli::config_initialization::initialize_settings;
use mediameta_cli::utils::init_logging;
use mediameta_cli::DefaultAppContainer;

/// Main entry point for the MediaMeta CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = initialize_settings(&cli)?;
    init_logging(settings.logging.level, settings.logging.format)?;
    info!("Starting MediaMeta");

    mediameta_cli::init().context("Failed to initialize FFmpeg")?;

    let container = DefaultAppContainer::new(settings);
    commands::run(&container, cli.command)?;

    info!("MediaMeta completed successfully");
    Ok(())
}
