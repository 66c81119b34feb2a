//! Media metadata parsing: extension dispatch and per-family extractors

use tracing::warn;

use crate::domain::model::{FileInfoRecord, MediaFileInfo};
use crate::domain::rules::RawFields;
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::source::OpenMedia;
use crate::utils::path::PathUtils;

pub mod document;
pub mod image;
pub mod registry;
pub mod video;

pub use document::DocumentParser;
pub use image::ImageParser;
pub use registry::MediaInspector;
pub use video::VideoParser;

/// Names a parse call works with, resolved by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    /// Name used for dispatch, possibly with directories
    pub filename: String,
    /// Caller-supplied logical name, defaulting to the basename
    pub original_filename: String,
}

impl FileNames {
    pub fn new(filename: impl Into<String>, original_filename: Option<&str>) -> Self {
        let filename = filename.into();
        let original_filename = original_filename
            .map(str::to_string)
            .unwrap_or_else(|| PathUtils::basename(&filename).to_string());
        Self {
            filename,
            original_filename,
        }
    }

    /// Identity fields shared by every record
    pub fn file_info(&self) -> MediaFileInfo {
        MediaFileInfo::new(
            PathUtils::basename(&self.filename).to_string(),
            self.original_filename.clone(),
            PathUtils::extension(&self.filename).to_lowercase(),
        )
    }
}

/// Turns an open media stream into a normalized record
pub trait MediaInfoParser: Send + Sync {
    /// Family name used in logs
    fn family(&self) -> &'static str;

    fn parse(&self, media: &mut OpenMedia<'_>, names: &FileNames) -> MediaMetaResult<FileInfoRecord>;
}

/// Parser for extensions that are known but never inspected
pub struct GenericParser {
    family: &'static str,
}

impl GenericParser {
    /// Registered media extensions without a dedicated extractor
    pub fn media() -> Self {
        Self { family: "media" }
    }

    /// Extra extensions accepted alongside media
    pub fn extra() -> Self {
        Self { family: "extra" }
    }
}

impl MediaInfoParser for GenericParser {
    fn family(&self) -> &'static str {
        self.family
    }

    fn parse(&self, _media: &mut OpenMedia<'_>, names: &FileNames) -> MediaMetaResult<FileInfoRecord> {
        Ok(FileInfoRecord::Generic(names.file_info()))
    }
}

/// First track of a kind; more than one is reported and the rest are ignored
pub(crate) fn first_track<'r>(
    tracks: &'r [RawFields],
    kind: &'static str,
    family: &'static str,
    names: &FileNames,
) -> MediaMetaResult<&'r RawFields> {
    if tracks.len() > 1 {
        warn!(
            filename = %names.original_filename,
            count = tracks.len(),
            "Got multiple {} tracks for {} file; using the first",
            kind,
            family
        );
    }
    tracks.first().ok_or_else(|| MediaMetaError::MissingTrack {
        kind,
        filename: names.original_filename.clone(),
    })
}

/// Copy `(from, to)` keys that are present in `source`
pub(crate) fn forward_fields(source: &RawFields, keys: &[(&str, &str)]) -> RawFields {
    let mut target = RawFields::new();
    for (from, to) in keys {
        source.forward(from, &mut target, to);
    }
    target
}
