//! CLI module for MediaMeta
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

/// MediaMeta - media metadata normalizer and thumbnail generator
///
/// Reads audio/video, image and PDF files, prints their metadata as normalized
/// records and writes bounded thumbnails.
#[derive(Parser, Debug)]
#[command(name = "mediameta")]
#[command(about = "MediaMeta - Normalized media metadata and thumbnails")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Settings file (default: mediameta.toml or config/mediameta.toml if present)
    #[arg(long, global = true, env = "MEDIAMETA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (overrides config and environment)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format: pretty, compact or json
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the normalized metadata record of a file
    Info(args::InfoArgs),
    /// Write one thumbnail of a file
    Thumbnail(args::ThumbnailArgs),
    /// Write one thumbnail per configured size
    Thumbnails(args::ThumbnailsArgs),
    /// Parse every supported file under a directory
    Scan(args::ScanArgs),
    /// Print or save the effective settings
    Config(args::ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::ThumbnailSize;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mediameta",
            "info",
            "movie.mp4",
            "--log-level",
            "debug",
            "--format",
            "yaml",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        match cli.command {
            Commands::Info(args) => {
                assert_eq!(args.file, PathBuf::from("movie.mp4"));
                assert_eq!(args.format, args::OutputFormat::Yaml);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_thumbnail_size_argument() {
        let cli = Cli::try_parse_from([
            "mediameta",
            "thumbnail",
            "a.png",
            "--output-dir",
            "out",
            "--size",
            "320x180",
        ])
        .unwrap();
        match cli.command {
            Commands::Thumbnail(args) => assert_eq!(args.size, ThumbnailSize::Box(320, 180)),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["mediameta", "thumbnail", "a.png", "--output-dir", "out", "--size", "0"]).is_err());
    }

    #[test]
    fn test_scan_thumbnails_require_output_dir() {
        assert!(Cli::try_parse_from(["mediameta", "scan", "media", "--thumbnails"]).is_err());
        assert!(Cli::try_parse_from(["mediameta", "scan", "media", "--thumbnails", "--output-dir", "t"]).is_ok());
    }
}
