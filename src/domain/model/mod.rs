// Domain models - Normalized media file records

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::domain::rules::RawFields;
use crate::error::MediaMetaResult;
use crate::output;

/// Identity shared by every file record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFileInfo {
    /// Basename of the resolved filename
    pub filename: String,
    /// Caller-supplied logical name
    pub original_filename: String,
    /// Lower-cased extension including the leading dot, or empty
    pub ext: String,
}

impl MediaFileInfo {
    pub fn new(filename: String, original_filename: String, ext: String) -> Self {
        Self {
            filename,
            original_filename,
            ext,
        }
    }
}

/// Container level metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFileGeneralInfo {
    pub container: String,
    pub file_size: u64,
    pub writing_application: Option<String>,
    /// Missing for some image formats
    pub internet_media_type: Option<String>,
}

impl MediaFileGeneralInfo {
    /// General info for still images, where the MIME type may be absent
    pub fn from_image_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            container: fields.string("container")?,
            file_size: fields.integer("file_size")?,
            writing_application: fields.opt_string("writing_application")?,
            internet_media_type: fields.opt_string("internet_media_type")?,
        })
    }

    /// General info for every other family, where the MIME type is required
    pub fn from_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            container: fields.string("container")?,
            file_size: fields.integer("file_size")?,
            writing_application: fields.opt_string("writing_application")?,
            internet_media_type: Some(fields.string("internet_media_type")?),
        })
    }
}

/// General info of audio/video containers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvFileGeneralInfo {
    #[serde(flatten)]
    pub general: MediaFileGeneralInfo,
    /// Milliseconds
    pub duration: i64,
    pub overall_bit_rate: u64,
}

impl AvFileGeneralInfo {
    pub fn from_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            general: MediaFileGeneralInfo::from_fields(fields)?,
            duration: fields.millis("duration")?,
            overall_bit_rate: fields.integer("overall_bit_rate")?,
        })
    }
}

/// Fields common to every elementary stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaTrackInfo {
    pub format: String,
    /// Missing for some containers (GIF)
    pub stream_size: Option<u64>,
}

impl MediaTrackInfo {
    pub fn from_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            format: fields.string("format")?,
            stream_size: fields.opt_integer("stream_size")?,
        })
    }
}

/// Fields common to audio and video streams
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvTrackInfo {
    #[serde(flatten)]
    pub track: MediaTrackInfo,
    pub codec_id: Option<String>,
    /// Milliseconds
    pub duration: i64,
    pub bit_rate: u64,
}

impl AvTrackInfo {
    pub fn from_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            track: MediaTrackInfo::from_fields(fields)?,
            codec_id: fields.opt_string("codec_id")?,
            duration: fields.millis("duration")?,
            bit_rate: fields.integer("bit_rate")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoTrackInfo {
    #[serde(flatten)]
    pub av: AvTrackInfo,
    pub format_profile: Option<String>,
    pub format_settings: Option<String>,
    pub width: u32,
    pub height: u32,
    pub bit_depth: Option<u32>,
    pub frame_count: u64,
    pub frame_rate: Decimal,
    pub frame_rate_mode: Option<String>,
    pub color_space: Option<String>,
    pub chroma_subsampling: Option<String>,
    pub bits_per_pixel_frame: Decimal,
    pub writing_library: Option<String>,
    /// Degrees
    pub rotation: Option<Decimal>,
}

impl VideoTrackInfo {
    pub fn from_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            av: AvTrackInfo::from_fields(fields)?,
            format_profile: fields.opt_string("format_profile")?,
            format_settings: fields.opt_string("format_settings")?,
            width: fields.integer("width")?,
            height: fields.integer("height")?,
            bit_depth: fields.opt_integer("bit_depth")?,
            frame_count: fields.integer("frame_count")?,
            frame_rate: fields.decimal("frame_rate")?,
            frame_rate_mode: fields.opt_string("frame_rate_mode")?,
            color_space: fields.opt_string("color_space")?,
            chroma_subsampling: fields.opt_string("chroma_subsampling")?,
            bits_per_pixel_frame: fields.decimal("bits_per_pixel_frame")?,
            writing_library: fields.opt_string("writing_library")?,
            rotation: fields.opt_decimal("rotation")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioTrackInfo {
    #[serde(flatten)]
    pub av: AvTrackInfo,
    pub format_additional_features: Option<String>,
    pub muxing_mode: Option<String>,
    pub channels: u32,
    pub channel_layout: Option<String>,
    pub sampling_rate: u32,
    pub compression_mode: Option<String>,
    pub encoded_date: Option<String>,
    pub tagged_date: Option<String>,
}

impl AudioTrackInfo {
    pub fn from_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            av: AvTrackInfo::from_fields(fields)?,
            format_additional_features: fields.opt_string("format_additional_features")?,
            muxing_mode: fields.opt_string("muxing_mode")?,
            channels: fields.integer("channels")?,
            channel_layout: fields.opt_string("channel_layout")?,
            sampling_rate: fields.integer("sampling_rate")?,
            compression_mode: fields.opt_string("compression_mode")?,
            encoded_date: fields.opt_string("encoded_date")?,
            tagged_date: fields.opt_string("tagged_date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageTrackInfo {
    #[serde(flatten)]
    pub track: MediaTrackInfo,
    pub format_profile: Option<String>,
    pub width: u32,
    pub height: u32,
    pub bit_depth: Option<u32>,
    pub color_space: Option<String>,
    pub chroma_subsampling: Option<String>,
}

impl ImageTrackInfo {
    pub fn from_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            track: MediaTrackInfo::from_fields(fields)?,
            format_profile: fields.opt_string("format_profile")?,
            width: fields.integer("width")?,
            height: fields.integer("height")?,
            bit_depth: fields.opt_integer("bit_depth")?,
            color_space: fields.opt_string("color_space")?,
            chroma_subsampling: fields.opt_string("chroma_subsampling")?,
        })
    }
}

/// Document structure and metadata. Dates are kept in their raw form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub pages: u32,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
}

impl DocumentInfo {
    pub fn from_fields(fields: &RawFields) -> MediaMetaResult<Self> {
        Ok(Self {
            pages: fields.integer("pages")?,
            author: fields.opt_string("author")?,
            creator: fields.opt_string("creator")?,
            producer: fields.opt_string("producer")?,
            subject: fields.opt_string("subject")?,
            title: fields.opt_string("title")?,
            creation_date: fields.opt_string("creation_date")?,
            modification_date: fields.opt_string("modification_date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoFileInfo {
    #[serde(flatten)]
    pub file: MediaFileInfo,
    pub general: AvFileGeneralInfo,
    pub video: Vec<VideoTrackInfo>,
    pub audio: Option<Vec<AudioTrackInfo>>,
}

impl VideoFileInfo {
    pub fn width(&self) -> Option<u32> {
        self.video.first().map(|track| track.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.video.first().map(|track| track.height)
    }

    /// Whole seconds, rounded up
    pub fn duration(&self) -> i64 {
        ceil_seconds(self.general.duration)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFileInfo {
    #[serde(flatten)]
    pub file: MediaFileInfo,
    pub general: MediaFileGeneralInfo,
    pub image: Vec<ImageTrackInfo>,
}

impl ImageFileInfo {
    pub fn width(&self) -> Option<u32> {
        self.image.first().map(|track| track.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.image.first().map(|track| track.height)
    }

    /// Images are instantaneous
    pub fn duration(&self) -> i64 {
        -1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfFileInfo {
    #[serde(flatten)]
    pub file: MediaFileInfo,
    pub general: MediaFileGeneralInfo,
    pub document: DocumentInfo,
}

impl PdfFileInfo {
    /// Negative page count: document length, not a time span
    pub fn duration(&self) -> i64 {
        -i64::from(self.document.pages)
    }
}

/// Result of a single parse call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileInfoRecord {
    /// Generic and "extra" extensions carry only the file identity
    Generic(MediaFileInfo),
    Video(VideoFileInfo),
    Image(ImageFileInfo),
    Pdf(PdfFileInfo),
}

impl FileInfoRecord {
    /// File identity shared by every variant
    pub fn file(&self) -> &MediaFileInfo {
        match self {
            FileInfoRecord::Generic(file) => file,
            FileInfoRecord::Video(info) => &info.file,
            FileInfoRecord::Image(info) => &info.file,
            FileInfoRecord::Pdf(info) => &info.file,
        }
    }

    /// Family name used in logs and text output
    pub fn family(&self) -> &'static str {
        match self {
            FileInfoRecord::Generic(_) => "generic",
            FileInfoRecord::Video(_) => "video",
            FileInfoRecord::Image(_) => "image",
            FileInfoRecord::Pdf(_) => "document",
        }
    }

    /// Pixel width of the first visual track
    pub fn width(&self) -> Option<u32> {
        match self {
            FileInfoRecord::Video(info) => info.width(),
            FileInfoRecord::Image(info) => info.width(),
            FileInfoRecord::Generic(_) | FileInfoRecord::Pdf(_) => None,
        }
    }

    /// Pixel height of the first visual track
    pub fn height(&self) -> Option<u32> {
        match self {
            FileInfoRecord::Video(info) => info.height(),
            FileInfoRecord::Image(info) => info.height(),
            FileInfoRecord::Generic(_) | FileInfoRecord::Pdf(_) => None,
        }
    }

    /// Seconds for AV content. Negative values are not durations: `-pages`
    /// for documents, `-1` for images and files without a timeline.
    pub fn duration(&self) -> i64 {
        match self {
            FileInfoRecord::Video(info) => info.duration(),
            FileInfoRecord::Image(info) => info.duration(),
            FileInfoRecord::Pdf(info) => info.duration(),
            FileInfoRecord::Generic(_) => -1,
        }
    }

    /// Nested mapping with every absent value removed
    pub fn as_dict(&self) -> MediaMetaResult<Value> {
        output::as_dict(self)
    }

    /// Indented JSON of [`as_dict`](Self::as_dict)
    pub fn as_json(&self) -> MediaMetaResult<String> {
        output::as_json(self)
    }
}

fn ceil_seconds(millis: i64) -> i64 {
    let whole = millis.div_euclid(1000);
    if millis.rem_euclid(1000) > 0 {
        whole + 1
    } else {
        whole
    }
}

#[cfg(test)]
mod tests;
