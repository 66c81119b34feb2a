//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::domain::settings::ThumbnailSize;

/// Rendering of a metadata record
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented JSON with absent fields removed
    #[default]
    Json,
    Yaml,
    /// Short human-readable summary
    Text,
}

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Media file path
    pub file: PathBuf,

    /// Name used for extension dispatch instead of the path
    #[arg(long)]
    pub filename: Option<String>,

    /// Logical name reported in the record (default: basename)
    #[arg(long)]
    pub original_filename: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Arguments for the thumbnail command
#[derive(Args, Debug)]
pub struct ThumbnailArgs {
    /// Media file path
    pub file: PathBuf,

    /// Directory the thumbnail is written to (created if missing)
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Bounding box: N for NxN or WxH
    #[arg(short, long, default_value_t = ThumbnailSize::default())]
    pub size: ThumbnailSize,

    /// Name used for extension dispatch and the derived output name
    #[arg(long)]
    pub filename: Option<String>,

    /// Output file name inside the output directory
    #[arg(long)]
    pub output_filename: Option<String>,

    /// Canvas color as r,g,b[,a], or "none" (default: configured background)
    #[arg(long)]
    pub background: Option<String>,
}

/// Arguments for the thumbnails command
#[derive(Args, Debug)]
pub struct ThumbnailsArgs {
    /// Media file path
    pub file: PathBuf,

    /// Directory the thumbnails are written to (created if missing)
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Canvas color as r,g,b[,a], or "none" (default: configured background)
    #[arg(long)]
    pub background: Option<String>,
}

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to walk
    pub dir: PathBuf,

    /// Directory for thumbnails
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Also write the configured thumbnail sizes for every file
    #[arg(long, requires = "output_dir")]
    pub thumbnails: bool,

    /// Do not descend into subdirectories
    #[arg(long)]
    pub no_recursive: bool,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Save the effective settings to this file instead of printing them
    #[arg(long)]
    pub write: Option<PathBuf>,
}
