// Probe image adapter - Still image probing using the image crate

use std::io::Cursor;

use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use tracing::info;

use crate::domain::rules::RawFields;
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::ports::{ProbePort, ProbeReport};
use crate::source::OpenMedia;

/// Reads format, geometry and color model from the image header
pub struct ProbeImageAdapter;

impl ProbeImageAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProbeImageAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbePort for ProbeImageAdapter {
    fn probe(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<ProbeReport> {
        let file_size = media.size()?;
        let bytes = media.read_all()?;

        let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
        let format = reader.format().ok_or_else(|| MediaMetaError::Probe {
            message: "Unrecognized image format".to_string(),
        })?;
        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();
        let color = decoder.color_type();
        info!(format = ?format, width, height, "Probed image");

        let mut general = RawFields::new();
        general.insert("format", format_name(format));
        general.insert("file_size", file_size);
        general.insert("internet_media_type", format.to_mime_type());

        let mut track = RawFields::new();
        track.insert("format", format_name(format));
        if format != ImageFormat::Gif {
            track.insert("stream_size", file_size);
        }
        track.insert("width", width);
        track.insert("height", height);
        track.insert("bit_depth", bit_depth(color));
        track.insert("color_space", color_space(color));

        Ok(ProbeReport {
            general: vec![general],
            image: vec![track],
            ..ProbeReport::default()
        })
    }
}

fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::WebP => "WebP".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// Bits per channel
fn bit_depth(color: ColorType) -> u32 {
    u32::from(color.bits_per_pixel()) / u32::from(color.channel_count().max(1))
}

fn color_space(color: ColorType) -> &'static str {
    match (color.has_color(), color.has_alpha()) {
        (true, true) => "RGBA",
        (true, false) => "RGB",
        (false, true) => "YA",
        (false, false) => "Y",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NamedHandle;
    use image::{DynamicImage, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::new(width, height))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_probe_png() {
        let bytes = png_bytes(40, 30);
        let size = bytes.len() as u64;
        let mut handle = NamedHandle::new(Cursor::new(bytes), "a.png");
        let mut media = OpenMedia::new(&mut handle);
        let report = ProbeImageAdapter::new().probe(&mut media).unwrap();

        let general = &report.general[0];
        assert_eq!(general.string("format").unwrap(), "PNG");
        assert_eq!(general.integer::<u64>("file_size").unwrap(), size);
        assert_eq!(general.string("internet_media_type").unwrap(), "image/png");

        let track = &report.image[0];
        assert_eq!(track.integer::<u32>("width").unwrap(), 40);
        assert_eq!(track.integer::<u32>("height").unwrap(), 30);
        assert_eq!(track.integer::<u32>("bit_depth").unwrap(), 8);
        assert_eq!(track.string("color_space").unwrap(), "RGBA");
        assert!(report.video.is_empty());
    }

    #[test]
    fn test_probe_rejects_garbage() {
        let mut handle = NamedHandle::new(Cursor::new(b"not an image".to_vec()), "a.png");
        let mut media = OpenMedia::new(&mut handle);
        assert!(ProbeImageAdapter::new().probe(&mut media).is_err());
    }
}
