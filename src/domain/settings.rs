// Domain settings - Extension registries, thumbnail sizes and logging defaults

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MediaMetaError, MediaMetaResult};
use crate::utils::logging::{LogFormat, LogLevel};

/// Complete settings tree, as loaded from `mediameta.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub logging: LoggingSettings,
    pub extensions: ExtensionSettings,
    pub thumbnails: ThumbnailSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Extension lists per family. Every entry includes its leading dot and is
/// matched case-sensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSettings {
    /// Files identified by name only
    pub media: Vec<String>,
    pub video: Vec<String>,
    pub image: Vec<String>,
    pub document: Vec<String>,
    /// Accepted but never inspected
    pub extra: Vec<String>,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        fn list(exts: &[&str]) -> Vec<String> {
            exts.iter().map(|ext| ext.to_string()).collect()
        }
        Self {
            media: list(&[".mp3", ".wav", ".flac", ".ogg"]),
            video: list(&[".mp4", ".mkv", ".avi", ".mov", ".webm", ".m4v", ".flv", ".wmv"]),
            image: list(&[".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp", ".tif", ".tiff"]),
            document: list(&[".pdf"]),
            extra: list(&[".txt", ".csv", ".zip"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    /// Sizes produced by batch generation, in order
    pub sizes: Vec<ThumbnailSize>,
    /// Default canvas; `None` keeps the resized image's own box
    pub background: Option<Background>,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            sizes: vec![
                ThumbnailSize::Square(128),
                ThumbnailSize::Square(256),
                ThumbnailSize::Square(512),
            ],
            background: None,
        }
    }
}

/// Requested thumbnail bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThumbnailSize {
    /// `n` means an `n`x`n` box
    Square(u32),
    Box(u32, u32),
}

impl ThumbnailSize {
    /// `(width, height)` of the box
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            ThumbnailSize::Square(n) => (n, n),
            ThumbnailSize::Box(w, h) => (w, h),
        }
    }

    pub fn is_empty(&self) -> bool {
        let (w, h) = self.dimensions();
        w == 0 || h == 0
    }
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        ThumbnailSize::Square(256)
    }
}

/// `256` for squares, `320x180` for boxes; used in output filenames
impl fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThumbnailSize::Square(n) => write!(f, "{}", n),
            ThumbnailSize::Box(w, h) => write!(f, "{}x{}", w, h),
        }
    }
}

impl FromStr for ThumbnailSize {
    type Err = MediaMetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MediaMetaError::Config {
            message: format!("Invalid thumbnail size '{}': expected N or WxH", s),
        };
        let text = s.trim();
        let size = match text.split_once(['x', 'X']) {
            Some((w, h)) => ThumbnailSize::Box(
                w.trim().parse().map_err(|_| invalid())?,
                h.trim().parse().map_err(|_| invalid())?,
            ),
            None => ThumbnailSize::Square(text.parse().map_err(|_| invalid())?),
        };
        if size.is_empty() {
            return Err(invalid());
        }
        Ok(size)
    }
}

/// Parse a comma separated size list such as `128,256,320x180`
pub fn parse_size_list(s: &str) -> MediaMetaResult<Vec<ThumbnailSize>> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Canvas color. A missing alpha means fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Background {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<u8>,
}

impl Background {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Translucent backgrounds need an alpha channel, hence PNG output
    pub fn is_translucent(&self) -> bool {
        matches!(self.a, Some(a) if a < 255)
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a.unwrap_or(255)]
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl TryFrom<Vec<u8>> for Background {
    type Error = MediaMetaError;

    fn try_from(channels: Vec<u8>) -> Result<Self, Self::Error> {
        match channels.as_slice() {
            [r, g, b] => Ok(Background::rgb(*r, *g, *b)),
            [r, g, b, a] => Ok(Background::rgba(*r, *g, *b, *a)),
            other => Err(MediaMetaError::Config {
                message: format!("Background needs 3 or 4 channels, got {}", other.len()),
            }),
        }
    }
}

impl From<Background> for Vec<u8> {
    fn from(bg: Background) -> Self {
        let mut channels = vec![bg.r, bg.g, bg.b];
        channels.extend(bg.a);
        channels
    }
}

impl FromStr for Background {
    type Err = MediaMetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| MediaMetaError::Config {
                message: format!("Invalid background '{}': {}", s, e),
            })?;
        Background::try_from(channels)
    }
}

/// Parse a background flag value; `none` clears the background
pub fn parse_background(s: &str) -> MediaMetaResult<Option<Background>> {
    if s.trim().eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

impl MediaSettings {
    /// Reject values no dispatcher or generator can work with
    pub fn validate(&self) -> MediaMetaResult<()> {
        let lists = [
            ("media", &self.extensions.media),
            ("video", &self.extensions.video),
            ("image", &self.extensions.image),
            ("document", &self.extensions.document),
            ("extra", &self.extensions.extra),
        ];
        for (family, exts) in lists {
            if let Some(bad) = exts.iter().find(|ext| !ext.starts_with('.') || ext.len() < 2) {
                return Err(MediaMetaError::Config {
                    message: format!(
                        "Extension '{}' in [extensions] {} must start with '.'",
                        bad, family
                    ),
                });
            }
        }

        if let Some(bad) = self.thumbnails.sizes.iter().find(|size| size.is_empty()) {
            return Err(MediaMetaError::Config {
                message: format!("Thumbnail size '{}' must be non-zero", bad),
            });
        }

        Ok(())
    }
}
