// Probe LibAV adapter - Container and stream probing using libav

use std::collections::HashMap;
use std::path::Path;

use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::format::context::Input;
use ffmpeg_next::media::Type;
use ffmpeg_next::{codec, Rational};
use tracing::{debug, info};

use crate::domain::rules::RawFields;
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::ports::{ProbePort, ProbeReport};
use crate::source::OpenMedia;

/// LibAV-based probing adapter for audio/video containers
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> MediaMetaResult<Input> {
        ffmpeg_next::format::input(&path).map_err(|e| MediaMetaError::Probe {
            message: format!("Failed to open {}: {}", path.display(), e),
        })
    }

    /// Bytes and packet counts per stream, gathered in one demux pass
    fn scan_packets(input: &mut Input) -> HashMap<usize, (u64, u64)> {
        let mut totals: HashMap<usize, (u64, u64)> = HashMap::new();
        for (stream, packet) in input.packets() {
            let entry = totals.entry(stream.index()).or_default();
            entry.0 += packet.size() as u64;
            entry.1 += 1;
        }
        totals
    }

    fn general_track(input: &Input, file_size: u64, media_type: Option<String>) -> RawFields {
        let mut general = RawFields::new();
        general.insert("format", container_name(input.format().name(), input.format().description()));
        general.insert("file_size", file_size);
        if input.duration() > 0 {
            general.insert("duration", input.duration() as f64 / 1000.0);
        }
        general.insert("overall_bit_rate", input.bit_rate().max(0));
        general.insert_opt("writing_application", input.metadata().get("encoder"));
        general.insert_opt("internet_media_type", media_type);
        general
    }

    fn video_track(
        stream: &ffmpeg_next::Stream,
        container_ms: Option<f64>,
        totals: Option<&(u64, u64)>,
    ) -> MediaMetaResult<RawFields> {
        let context = CodecContext::from_parameters(stream.parameters())?;
        let id = context.id();
        let decoder = context.decoder().video()?;

        let mut track = RawFields::new();
        track.insert("format", codec_format(id));
        track.insert("codec_id", id.name());
        let duration_ms = stream_millis(stream).or(container_ms);
        track.insert_opt("duration", duration_ms);
        let bit_rate = effective_bit_rate(decoder.bit_rate() as u64, totals, duration_ms);
        track.insert("bit_rate", bit_rate);
        if let Some((bytes, _)) = totals {
            track.insert("stream_size", *bytes);
        }
        track.insert_opt("format_profile", profile_name(decoder.profile()));
        track.insert("width", decoder.width());
        track.insert("height", decoder.height());

        let pixel = format!("{:?}", decoder.format()).to_lowercase();
        track.insert_opt("bit_depth", pixel_bit_depth(&pixel));
        track.insert_opt("color_space", pixel_color_space(&pixel));
        track.insert_opt("chroma_subsampling", pixel_chroma(&pixel));

        let frame_count = match stream.frames() {
            n if n > 0 => n as u64,
            _ => totals.map(|(_, packets)| *packets).unwrap_or(0),
        };
        track.insert("frame_count", frame_count);

        let fps = rational_to_f64(stream.avg_frame_rate()).or_else(|| rational_to_f64(stream.rate()));
        if let Some(fps) = fps {
            track.insert("frame_rate", format!("{:.3}", fps));
            let area = f64::from(decoder.width()) * f64::from(decoder.height());
            if area > 0.0 {
                let bits = bit_rate as f64 / (area * fps);
                track.insert("bits__pixel_frame", format!("{:.3}", bits));
            }
        }
        let mode = if stream.avg_frame_rate() == stream.rate() { "CFR" } else { "VFR" };
        track.insert("frame_rate_mode", mode);

        let metadata = stream.metadata();
        track.insert_opt("writing_library", metadata.get("encoder"));
        track.insert_opt("rotation", metadata.get("rotate"));
        track.insert_opt("encoded_date", metadata.get("creation_time"));
        track.insert_opt("tagged_date", metadata.get("creation_time"));
        Ok(track)
    }

    fn audio_track(
        stream: &ffmpeg_next::Stream,
        container_ms: Option<f64>,
        totals: Option<&(u64, u64)>,
    ) -> MediaMetaResult<RawFields> {
        let context = CodecContext::from_parameters(stream.parameters())?;
        let id = context.id();
        let decoder = context.decoder().audio()?;

        let mut track = RawFields::new();
        track.insert("format", codec_format(id));
        track.insert("codec_id", id.name());
        let duration_ms = stream_millis(stream).or(container_ms);
        track.insert_opt("duration", duration_ms);
        track.insert("bit_rate", effective_bit_rate(decoder.bit_rate() as u64, totals, duration_ms));
        if let Some((bytes, _)) = totals {
            track.insert("stream_size", *bytes);
        }

        let channels = u32::try_from(decoder.ch_layout().channels()).unwrap_or(0);
        track.insert("channel_s", channels);
        track.insert_opt("channel_layout", channel_layout(channels));
        track.insert("sampling_rate", decoder.rate());
        track.insert("compression_mode", compression_mode(id));

        let metadata = stream.metadata();
        track.insert_opt("encoded_date", metadata.get("creation_time"));
        track.insert_opt("tagged_date", metadata.get("creation_time"));
        Ok(track)
    }
}

impl Default for ProbeLibavAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbePort for ProbeLibavAdapter {
    fn probe(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<ProbeReport> {
        let file_size = media.size()?;
        let local = media.local_file()?;
        let path = local.path();
        info!("Probing media file: {}", path.display());
        let media_type = guess_media_type(media.name().as_deref(), path);

        let mut input = Self::open(path)?;
        let totals = Self::scan_packets(&mut input);
        let container_ms = (input.duration() > 0).then(|| input.duration() as f64 / 1000.0);

        let mut report = ProbeReport {
            general: vec![Self::general_track(&input, file_size, media_type)],
            ..ProbeReport::default()
        };

        for stream in input.streams() {
            let totals = totals.get(&stream.index());
            match stream.parameters().medium() {
                Type::Video => report.video.push(Self::video_track(&stream, container_ms, totals)?),
                Type::Audio => report.audio.push(Self::audio_track(&stream, container_ms, totals)?),
                other => debug!(index = stream.index(), medium = ?other, "Ignoring stream"),
            }
        }

        info!(
            video = report.video.len(),
            audio = report.audio.len(),
            "Probe completed"
        );
        Ok(report)
    }
}

/// MIME type from the dispatch filename, else from the local copy
fn guess_media_type(filename: Option<&str>, local: &Path) -> Option<String> {
    filename
        .and_then(|name| mime_guess::from_path(name).first())
        .or_else(|| mime_guess::from_path(local).first())
        .map(|mime| mime.essence_str().to_string())
}

/// Codec-reported bit rate, or the packet bytes over the duration when the
/// container carries none (Matroska, WebM)
fn effective_bit_rate(
    reported: u64,
    totals: Option<&(u64, u64)>,
    duration_ms: Option<f64>,
) -> u64 {
    if reported > 0 {
        return reported;
    }
    match (totals, duration_ms) {
        (Some((bytes, _)), Some(ms)) if ms > 0.0 => (*bytes as f64 * 8000.0 / ms).round() as u64,
        _ => 0,
    }
}

fn rational_to_f64(rate: Rational) -> Option<f64> {
    if rate.numerator() > 0 && rate.denominator() > 0 {
        Some(f64::from(rate))
    } else {
        None
    }
}

fn stream_millis(stream: &ffmpeg_next::Stream) -> Option<f64> {
    let duration = stream.duration();
    if duration <= 0 || duration == ffmpeg_next::ffi::AV_NOPTS_VALUE {
        return None;
    }
    Some(duration as f64 * f64::from(stream.time_base()) * 1000.0)
}

/// Container names in the MediaInfo vocabulary
fn container_name(short: &str, description: &str) -> String {
    match short.split(',').next().unwrap_or(short) {
        "mov" | "mp4" => "MPEG-4".to_string(),
        "matroska" => "Matroska".to_string(),
        "webm" => "WebM".to_string(),
        "avi" => "AVI".to_string(),
        "flv" => "Flash Video".to_string(),
        "asf" => "Windows Media".to_string(),
        "mpegts" => "MPEG-TS".to_string(),
        "mpeg" => "MPEG-PS".to_string(),
        "ogg" => "Ogg".to_string(),
        _ => description.to_string(),
    }
}

/// Codec format names in the MediaInfo vocabulary
fn codec_format(id: codec::Id) -> String {
    match id {
        codec::Id::H264 => "AVC".to_string(),
        codec::Id::HEVC => "HEVC".to_string(),
        codec::Id::AV1 => "AV1".to_string(),
        codec::Id::VP8 => "VP8".to_string(),
        codec::Id::VP9 => "VP9".to_string(),
        codec::Id::MPEG4 => "MPEG-4 Visual".to_string(),
        codec::Id::MPEG2VIDEO => "MPEG Video".to_string(),
        codec::Id::AAC => "AAC".to_string(),
        codec::Id::MP3 => "MPEG Audio".to_string(),
        codec::Id::AC3 => "AC-3".to_string(),
        codec::Id::EAC3 => "E-AC-3".to_string(),
        codec::Id::OPUS => "Opus".to_string(),
        codec::Id::VORBIS => "Vorbis".to_string(),
        codec::Id::FLAC => "FLAC".to_string(),
        other => other.name().to_uppercase(),
    }
}

fn compression_mode(id: codec::Id) -> &'static str {
    let name = id.name();
    if name.starts_with("pcm_") || matches!(id, codec::Id::FLAC | codec::Id::ALAC) {
        "Lossless"
    } else {
        "Lossy"
    }
}

fn profile_name(profile: codec::Profile) -> Option<String> {
    match profile {
        codec::Profile::Unknown | codec::Profile::Reserved => None,
        other => {
            let debug = format!("{:?}", other);
            // `H264(High)` -> `High`
            let inner = debug
                .split_once('(')
                .map(|(_, rest)| rest.trim_end_matches(')').to_string())
                .unwrap_or(debug);
            Some(inner)
        }
    }
}

fn pixel_bit_depth(pixel: &str) -> Option<u32> {
    if pixel.contains("10le") || pixel.contains("10be") || pixel.contains("p010") {
        Some(10)
    } else if pixel.contains("12le") || pixel.contains("12be") {
        Some(12)
    } else if pixel.starts_with("yuv") || pixel.starts_with("nv") || pixel.contains("rgb") || pixel.starts_with("gray") {
        Some(8)
    } else {
        None
    }
}

fn pixel_color_space(pixel: &str) -> Option<&'static str> {
    if pixel.starts_with("yuv") || pixel.starts_with("nv") || pixel.starts_with("p010") {
        Some("YUV")
    } else if pixel.contains("rgb") || pixel.contains("bgr") || pixel.starts_with("gbr") {
        Some("RGB")
    } else if pixel.starts_with("gray") {
        Some("Y")
    } else {
        None
    }
}

fn pixel_chroma(pixel: &str) -> Option<&'static str> {
    if pixel.contains("420") || pixel.starts_with("nv12") || pixel.starts_with("nv21") || pixel.starts_with("p010") {
        Some("4:2:0")
    } else if pixel.contains("422") {
        Some("4:2:2")
    } else if pixel.contains("444") {
        Some("4:4:4")
    } else if pixel.contains("411") {
        Some("4:1:1")
    } else {
        None
    }
}

fn channel_layout(channels: u32) -> Option<&'static str> {
    match channels {
        1 => Some("M"),
        2 => Some("L R"),
        6 => Some("L R C LFE Ls Rs"),
        8 => Some("L R C LFE Ls Rs Lb Rb"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_names() {
        assert_eq!(container_name("mov,mp4,m4a,3gp,3g2,mj2", "QuickTime / MOV"), "MPEG-4");
        assert_eq!(container_name("matroska,webm", "Matroska / WebM"), "Matroska");
        assert_eq!(container_name("nut", "NUT"), "NUT");
    }

    #[test]
    fn test_pixel_format_details() {
        assert_eq!(pixel_bit_depth("yuv420p"), Some(8));
        assert_eq!(pixel_bit_depth("yuv420p10le"), Some(10));
        assert_eq!(pixel_color_space("yuv420p"), Some("YUV"));
        assert_eq!(pixel_color_space("rgb24"), Some("RGB"));
        assert_eq!(pixel_chroma("yuv422p"), Some("4:2:2"));
        assert_eq!(pixel_chroma("rgb24"), None);
    }

    #[test]
    fn test_compression_mode() {
        assert_eq!(compression_mode(codec::Id::AAC), "Lossy");
        assert_eq!(compression_mode(codec::Id::FLAC), "Lossless");
        assert_eq!(compression_mode(codec::Id::PCM_S16LE), "Lossless");
    }

    #[test]
    fn test_bit_rate_falls_back_to_packet_bytes() {
        assert_eq!(effective_bit_rate(128_000, Some(&(1_000, 10)), Some(2_000.0)), 128_000);
        // 250 kB over 2 s
        assert_eq!(effective_bit_rate(0, Some(&(250_000, 60)), Some(2_000.0)), 1_000_000);
        assert_eq!(effective_bit_rate(0, None, Some(2_000.0)), 0);
        assert_eq!(effective_bit_rate(0, Some(&(250_000, 60)), None), 0);
    }

    #[test]
    fn test_media_type_prefers_dispatch_filename() {
        let spooled = Path::new("/tmp/mediameta-abc123");
        assert_eq!(guess_media_type(Some("clip.webm"), spooled).as_deref(), Some("video/webm"));
        assert_eq!(
            guess_media_type(None, Path::new("/tmp/mediameta-abc.mp4")).as_deref(),
            Some("video/mp4")
        );
        assert_eq!(guess_media_type(Some("blob"), spooled), None);
    }
}
