// Image extractor - Probe report to image file record

use std::sync::Arc;

use super::{first_track, forward_fields, FileNames, MediaInfoParser};
use crate::domain::model::{FileInfoRecord, ImageFileInfo, ImageTrackInfo, MediaFileGeneralInfo};
use crate::error::MediaMetaResult;
use crate::ports::ProbePort;
use crate::source::OpenMedia;

const GENERAL_KEYS: [(&str, &str); 4] = [
    ("format", "container"),
    ("file_size", "file_size"),
    ("writing_application", "writing_application"),
    ("internet_media_type", "internet_media_type"),
];

// Encoded and tagged dates are not part of the image track record.
const IMAGE_TRACK_KEYS: [(&str, &str); 8] = [
    ("format", "format"),
    ("stream_size", "stream_size"),
    ("format_profile", "format_profile"),
    ("width", "width"),
    ("height", "height"),
    ("bit_depth", "bit_depth"),
    ("color_space", "color_space"),
    ("chroma_subsampling", "chroma_subsampling"),
];

/// Extracts container and first image track
pub struct ImageParser {
    probe: Arc<dyn ProbePort>,
}

impl ImageParser {
    pub fn new(probe: Arc<dyn ProbePort>) -> Self {
        Self { probe }
    }
}

impl MediaInfoParser for ImageParser {
    fn family(&self) -> &'static str {
        "image"
    }

    fn parse(&self, media: &mut OpenMedia<'_>, names: &FileNames) -> MediaMetaResult<FileInfoRecord> {
        let report = self.probe.probe(media)?;

        let general = first_track(&report.general, "general", "image", names)?;
        let general = MediaFileGeneralInfo::from_image_fields(&forward_fields(general, &GENERAL_KEYS))?;

        let image = first_track(&report.image, "image", "image", names)?;
        let image = ImageTrackInfo::from_fields(&forward_fields(image, &IMAGE_TRACK_KEYS))?;

        Ok(FileInfoRecord::Image(ImageFileInfo {
            file: names.file_info(),
            general,
            image: vec![image],
        }))
    }
}
