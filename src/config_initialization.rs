//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::TomlConfigAdapter;
use crate::cli::Cli;
use crate::domain::settings::{parse_background, parse_size_list, MediaSettings};
use crate::ports::ConfigPort;

/// Environment variables read by [`apply_environment_overrides`]
pub const ENV_LOG_LEVEL: &str = "MEDIAMETA_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "MEDIAMETA_LOG_FORMAT";
pub const ENV_THUMBNAIL_SIZES: &str = "MEDIAMETA_THUMBNAIL_SIZES";
pub const ENV_THUMBNAIL_BACKGROUND: &str = "MEDIAMETA_THUMBNAIL_BACKGROUND";

/// Build settings following precedence: CLI > Env > File > Defaults
pub fn initialize_settings(cli: &Cli) -> Result<MediaSettings> {
    let mut settings = load_config_file(&TomlConfigAdapter::new(), cli)?;
    apply_environment_overrides(&mut settings, |key| std::env::var(key).ok())?;
    apply_cli_overrides(&mut settings, cli);
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

/// Settings from `--config`, else the first default file found, else defaults.
/// An explicit path that cannot be loaded is an error.
pub fn load_config_file(config: &dyn ConfigPort, cli: &Cli) -> Result<MediaSettings> {
    if let Some(path) = &cli.config {
        return config
            .load_settings(path)
            .with_context(|| format!("Failed to load config file {}", path.display()));
    }

    match TomlConfigAdapter::find_default_config() {
        Some(path) => config
            .load_settings(&path)
            .with_context(|| format!("Failed to load config file {}", path.display())),
        None => Ok(MediaSettings::default()),
    }
}

/// Apply `MEDIAMETA_*` overrides read through `lookup`
pub fn apply_environment_overrides(
    settings: &mut MediaSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let mut overrides = 0;

    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        settings.logging.level = value
            .parse()
            .with_context(|| format!("Invalid {}", ENV_LOG_LEVEL))?;
        overrides += 1;
    }
    if let Some(value) = lookup(ENV_LOG_FORMAT) {
        settings.logging.format = value
            .parse()
            .with_context(|| format!("Invalid {}", ENV_LOG_FORMAT))?;
        overrides += 1;
    }
    if let Some(value) = lookup(ENV_THUMBNAIL_SIZES) {
        settings.thumbnails.sizes =
            parse_size_list(&value).with_context(|| format!("Invalid {}", ENV_THUMBNAIL_SIZES))?;
        overrides += 1;
    }
    if let Some(value) = lookup(ENV_THUMBNAIL_BACKGROUND) {
        settings.thumbnails.background = parse_background(&value)
            .with_context(|| format!("Invalid {}", ENV_THUMBNAIL_BACKGROUND))?;
        overrides += 1;
    }

    if overrides > 0 {
        info!("Applied {} environment variable overrides", overrides);
    }
    Ok(())
}

/// Apply global CLI flags
pub fn apply_cli_overrides(settings: &mut MediaSettings, cli: &Cli) {
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
}
