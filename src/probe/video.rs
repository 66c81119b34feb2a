// Video extractor - Probe report to video file record

use std::sync::Arc;

use tracing::debug;

use super::{first_track, forward_fields, FileNames, MediaInfoParser};
use crate::domain::model::{
    AudioTrackInfo, AvFileGeneralInfo, FileInfoRecord, VideoFileInfo, VideoTrackInfo,
};
use crate::error::MediaMetaResult;
use crate::ports::ProbePort;
use crate::source::OpenMedia;

const GENERAL_KEYS: [(&str, &str); 6] = [
    ("format", "container"),
    ("file_size", "file_size"),
    ("duration", "duration"),
    ("overall_bit_rate", "overall_bit_rate"),
    ("writing_application", "writing_application"),
    ("internet_media_type", "internet_media_type"),
];

const AV_TRACK_KEYS: [(&str, &str); 5] = [
    ("format", "format"),
    ("codec_id", "codec_id"),
    ("duration", "duration"),
    ("bit_rate", "bit_rate"),
    ("stream_size", "stream_size"),
];

const VIDEO_TRACK_KEYS: [(&str, &str); 13] = [
    ("format_profile", "format_profile"),
    ("format_settings", "format_settings"),
    ("width", "width"),
    ("height", "height"),
    ("bit_depth", "bit_depth"),
    ("frame_count", "frame_count"),
    ("frame_rate", "frame_rate"),
    ("frame_rate_mode", "frame_rate_mode"),
    ("color_space", "color_space"),
    ("chroma_subsampling", "chroma_subsampling"),
    ("bits__pixel_frame", "bits_per_pixel_frame"),
    ("writing_library", "writing_library"),
    ("rotation", "rotation"),
];

const AUDIO_TRACK_KEYS: [(&str, &str); 8] = [
    ("format_additionalfeatures", "format_additional_features"),
    ("muxing_mode", "muxing_mode"),
    ("channel_s", "channels"),
    ("channel_layout", "channel_layout"),
    ("sampling_rate", "sampling_rate"),
    ("compression_mode", "compression_mode"),
    ("encoded_date", "encoded_date"),
    ("tagged_date", "tagged_date"),
];

/// Extracts container, first video track and optional first audio track
pub struct VideoParser {
    probe: Arc<dyn ProbePort>,
}

impl VideoParser {
    pub fn new(probe: Arc<dyn ProbePort>) -> Self {
        Self { probe }
    }
}

impl MediaInfoParser for VideoParser {
    fn family(&self) -> &'static str {
        "video"
    }

    fn parse(&self, media: &mut OpenMedia<'_>, names: &FileNames) -> MediaMetaResult<FileInfoRecord> {
        let report = self.probe.probe(media)?;

        let general = first_track(&report.general, "general", "video", names)?;
        let general = AvFileGeneralInfo::from_fields(&forward_fields(general, &GENERAL_KEYS))?;

        let video = first_track(&report.video, "video", "video", names)?;
        let mut fields = forward_fields(video, &AV_TRACK_KEYS);
        for (from, to) in VIDEO_TRACK_KEYS {
            video.forward(from, &mut fields, to);
        }
        let video = VideoTrackInfo::from_fields(&fields)?;

        let audio = if report.audio.is_empty() {
            None
        } else {
            let track = first_track(&report.audio, "audio", "video", names)?;
            let mut fields = forward_fields(track, &AV_TRACK_KEYS);
            for (from, to) in AUDIO_TRACK_KEYS {
                track.forward(from, &mut fields, to);
            }
            Some(vec![AudioTrackInfo::from_fields(&fields)?])
        };

        debug!(
            filename = %names.original_filename,
            has_audio = audio.is_some(),
            "Parsed video file"
        );
        Ok(FileInfoRecord::Video(VideoFileInfo {
            file: names.file_info(),
            general,
            video: vec![video],
            audio,
        }))
    }
}
