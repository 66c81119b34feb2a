//! Command implementations

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::adapters::TomlConfigAdapter;
use crate::app::{AppContainer, DefaultAppContainer};
use crate::cli::args::{ConfigArgs, InfoArgs, OutputFormat, ScanArgs, ThumbnailArgs, ThumbnailsArgs};
use crate::cli::Commands;
use crate::domain::model::FileInfoRecord;
use crate::domain::settings::{parse_background, Background};
use crate::output;
use crate::source::{MediaSource, NamedHandle};
use crate::thumbnail::{ThumbnailOutput, ThumbnailRequest};

/// Dispatch a parsed command, printing results to stdout
pub fn run(container: &DefaultAppContainer, command: Commands) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::Info(args) => {
            info!("Executing info command");
            info(container, &args, &mut out)
        }
        Commands::Thumbnail(args) => {
            info!("Executing thumbnail command");
            thumbnail(container, &args, &mut out)
        }
        Commands::Thumbnails(args) => {
            info!("Executing thumbnails command");
            thumbnails(container, &args, &mut out)
        }
        Commands::Scan(args) => {
            info!("Executing scan command");
            scan(container, &args, &mut out)
        }
        Commands::Config(args) => {
            info!("Executing config command");
            config(container, &args, &mut out)
        }
    }
}

/// Execute the info command
pub fn info(container: &dyn AppContainer, args: &InfoArgs, out: &mut dyn Write) -> Result<()> {
    ensure_file(&args.file)?;

    let record = with_source(&args.file, args.filename.as_deref(), |source| {
        container
            .inspector()
            .get_media_info(source, args.filename.as_deref(), args.original_filename.as_deref())
    })?
    .with_context(|| format!("Failed to read metadata of {}", args.file.display()))?;

    let rendered = match args.format {
        OutputFormat::Json => record.as_json()?,
        OutputFormat::Yaml => output::as_yaml(&record)?,
        OutputFormat::Text => render_text(&record),
    };
    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

/// Execute the thumbnail command
pub fn thumbnail(container: &dyn AppContainer, args: &ThumbnailArgs, out: &mut dyn Write) -> Result<()> {
    ensure_file(&args.file)?;

    let service = container.thumbnails();
    let size = args.size;
    let background = resolve_background(args.background.as_deref(), service.default_background())?;

    let request = ThumbnailRequest {
        filename: args.filename.as_deref(),
        size,
        output_filename: args.output_filename.as_deref(),
        background,
    };
    let written = with_source(&args.file, request.filename, |source| {
        service.generate_thumbnail(source, &args.output_dir, &request)
    })?
    .with_context(|| format!("Failed to generate thumbnail of {}", args.file.display()))?;

    report_thumbnail(out, &args.file, written.as_ref())
}

/// Hand `f` the file as a path, or as a handle when the caller names it explicitly
fn with_source<T>(
    file: &Path,
    filename: Option<&str>,
    f: impl FnOnce(MediaSource<'_>) -> T,
) -> Result<T> {
    match filename {
        None => Ok(f(MediaSource::Path(file))),
        Some(_) => {
            let mut handle =
                NamedHandle::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
            Ok(f(MediaSource::Handle(&mut handle)))
        }
    }
}

/// Execute the thumbnails command
pub fn thumbnails(container: &dyn AppContainer, args: &ThumbnailsArgs, out: &mut dyn Write) -> Result<()> {
    ensure_file(&args.file)?;

    let service = container.thumbnails();
    let background = resolve_background(args.background.as_deref(), service.default_background())?;
    let results = service.generate_thumbnails(
        MediaSource::Path(&args.file),
        &args.output_dir,
        None,
        background,
    );

    let mut failed = 0;
    for (size, result) in service.sizes().iter().zip(results) {
        match result {
            Ok(written) => report_thumbnail(out, &args.file, written.as_ref())?,
            Err(e) => {
                failed += 1;
                writeln!(out, "{}: failed: {}", size, e)?;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} thumbnails failed", failed, service.sizes().len());
    }
    Ok(())
}

/// Totals of a directory scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub parsed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Execute the scan command. Records are printed as one JSON object per line.
pub fn scan(container: &dyn AppContainer, args: &ScanArgs, out: &mut dyn Write) -> Result<()> {
    let summary = scan_directory(container, args, out)?;
    info!(
        parsed = summary.parsed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Scan completed"
    );
    if summary.failed > 0 {
        anyhow::bail!("{} file(s) under {} failed", summary.failed, args.dir.display());
    }
    Ok(())
}

/// Walk `args.dir` and parse every supported file; failures are counted, not raised
pub fn scan_directory(container: &dyn AppContainer, args: &ScanArgs, out: &mut dyn Write) -> Result<ScanSummary> {
    if !args.dir.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", args.dir.display());
    }

    let inspector = container.inspector();
    let service = container.thumbnails();
    let max_depth = if args.no_recursive { 1 } else { usize::MAX };
    let mut summary = ScanSummary::default();

    for entry in WalkDir::new(&args.dir).max_depth(max_depth).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Failed to read directory entry: {}", e);
                summary.failed += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = path.to_string_lossy();
        if !inspector.supports(&name) {
            warn!(filename = %name, "Skipping file with unsupported extension");
            summary.skipped += 1;
            continue;
        }

        let record = match inspector.get_media_info(MediaSource::Path(path), None, None) {
            Ok(record) => record,
            Err(e) => {
                error!(filename = %name, "Failed to parse: {}", e);
                summary.failed += 1;
                continue;
            }
        };
        writeln!(out, "{}", serde_json::to_string(&record.as_dict()?)?)?;
        summary.parsed += 1;

        if let (true, Some(output_dir)) = (args.thumbnails, args.output_dir.as_deref()) {
            let results = service.generate_thumbnails(
                MediaSource::Path(path),
                output_dir,
                None,
                service.default_background(),
            );
            if results.iter().any(|r| r.is_err()) {
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Execute the config command
pub fn config(container: &DefaultAppContainer, args: &ConfigArgs, out: &mut dyn Write) -> Result<()> {
    match &args.write {
        Some(path) => {
            container
                .config()
                .save_settings(container.settings(), path)
                .with_context(|| format!("Failed to write settings to {}", path.display()))?;
            writeln!(out, "{}", path.display())?;
        }
        None => {
            let rendered = TomlConfigAdapter::serialize(container.settings())?;
            write!(out, "{}", rendered)?;
        }
    }
    Ok(())
}

/// Short human-readable summary of a record
pub fn render_text(record: &FileInfoRecord) -> String {
    let file = record.file();
    let mut lines = vec![
        format!("Filename: {}", file.filename),
        format!("Original filename: {}", file.original_filename),
        format!("Extension: {}", file.ext),
        format!("Type: {}", record.family()),
    ];
    if let (Some(width), Some(height)) = (record.width(), record.height()) {
        lines.push(format!("Size: {}x{}", width, height));
    }
    let duration = record.duration();
    match record {
        FileInfoRecord::Pdf(_) => lines.push(format!("Pages: {}", -duration)),
        _ if duration >= 0 => lines.push(format!("Duration: {}s", duration)),
        _ => {}
    }
    lines.join("\n")
}

fn resolve_background(flag: Option<&str>, default: Option<Background>) -> Result<Option<Background>> {
    match flag {
        Some(value) => parse_background(value).with_context(|| format!("Invalid background '{}'", value)),
        None => Ok(default),
    }
}

fn report_thumbnail(out: &mut dyn Write, file: &Path, written: Option<&ThumbnailOutput>) -> Result<()> {
    match written {
        Some(thumb) => writeln!(out, "{}", thumb.path.display())?,
        None => writeln!(out, "No thumbnail generator for {}", file.display())?,
    }
    Ok(())
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    Ok(())
}
