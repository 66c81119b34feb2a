// Ports - Collaborator contracts

use std::path::Path;

use image::DynamicImage;

use crate::domain::rules::RawFields;
use crate::domain::settings::MediaSettings;
use crate::error::MediaMetaResult;
use crate::source::OpenMedia;

/// Raw tracks reported by a probing collaborator.
///
/// Keys follow the MediaInfo naming (`format`, `channel_s`, `bits__pixel_frame`, ...);
/// the family extractors rename and coerce them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    pub general: Vec<RawFields>,
    pub video: Vec<RawFields>,
    pub audio: Vec<RawFields>,
    pub image: Vec<RawFields>,
}

/// Port for container and stream probing
pub trait ProbePort: Send + Sync {
    /// Probe the whole stream once and report every track found
    fn probe(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<ProbeReport>;
}

/// Port for document parsing and rasterization
pub trait DocumentPort: Send + Sync {
    /// Page count under `pages` plus the document metadata tags
    fn read_document(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<RawFields>;

    /// First page rendered to a bitmap
    fn render_first_page(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<DynamicImage>;
}

/// A decoded video frame with its presentation time
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub time_secs: f64,
    pub image: DynamicImage,
}

/// Lazily decodes key frames from the start of a stream
pub trait KeyframeReader {
    /// Container duration in microseconds
    fn duration_micros(&self) -> i64;

    /// Next key frame, or `None` at end of stream
    fn next_frame(&mut self) -> MediaMetaResult<Option<DecodedFrame>>;
}

/// Port for key-frame decoding
pub trait VideoFramePort: Send + Sync {
    fn open_keyframes<'m>(
        &self,
        media: &'m mut OpenMedia<'_>,
    ) -> MediaMetaResult<Box<dyn KeyframeReader + 'm>>;
}

/// Port for settings persistence
pub trait ConfigPort: Send + Sync {
    /// Load settings from a file, falling back to defaults for missing sections
    fn load_settings(&self, path: &Path) -> MediaMetaResult<MediaSettings>;

    /// Write settings to a file, creating parent directories
    fn save_settings(&self, settings: &MediaSettings, path: &Path) -> MediaMetaResult<()>;
}
