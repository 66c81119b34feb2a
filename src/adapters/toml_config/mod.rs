// TOML config adapter - Settings management using TOML files

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::settings::MediaSettings;
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::ports::ConfigPort;

/// File names searched, in order, when no config path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["mediameta.toml", "config/mediameta.toml"];

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    pub fn new() -> Self {
        Self
    }

    /// First default config file that exists
    pub fn find_default_config() -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }

    /// Parse settings from TOML text; missing sections keep their defaults
    pub fn parse(content: &str) -> MediaMetaResult<MediaSettings> {
        let settings: MediaSettings = toml::from_str(content).map_err(|e| MediaMetaError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Render settings as TOML text
    pub fn serialize(settings: &MediaSettings) -> MediaMetaResult<String> {
        toml::to_string_pretty(settings).map_err(|e| MediaMetaError::Config {
            message: format!("Failed to serialize config: {}", e),
        })
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigPort for TomlConfigAdapter {
    fn load_settings(&self, path: &Path) -> MediaMetaResult<MediaSettings> {
        if !path.is_file() {
            return Err(MediaMetaError::Config {
                message: format!("Config file does not exist: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let settings = Self::parse(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(settings)
    }

    fn save_settings(&self, settings: &MediaSettings, path: &Path) -> MediaMetaResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::serialize(settings)?)?;
        info!("Saved configuration to: {}", path.display());
        Ok(())
    }
}
