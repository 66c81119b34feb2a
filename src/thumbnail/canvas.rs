// Canvas - Aspect-preserving resize, background compositing and encoding

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

use crate::domain::settings::Background;
use crate::error::{MediaMetaError, MediaMetaResult};

/// JPEG quality for every thumbnail
pub const JPEG_QUALITY: u8 = 75;

/// Largest size within `bounds` with the aspect ratio of `source`. Never upscales.
pub fn fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (width, height) = source;
    let (max_width, max_height) = bounds;
    if width <= max_width && height <= max_height {
        return source;
    }

    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let fitted = |side: u32, limit: u32| ((f64::from(side) * scale).round() as u32).clamp(1, limit.max(1));
    (fitted(width, max_width), fitted(height, max_height))
}

/// Shrink `image` to fit inside `bounds`
pub fn fit_image(image: DynamicImage, bounds: (u32, u32)) -> DynamicImage {
    let (width, height) = fit_dimensions((image.width(), image.height()), bounds);
    if (width, height) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Lanczos3)
    }
}

/// Offset that centers `inner` within `outer`, truncated to whole pixels
fn centered(outer: (u32, u32), inner: (u32, u32)) -> (i64, i64) {
    (
        i64::from(outer.0.saturating_sub(inner.0) / 2),
        i64::from(outer.1.saturating_sub(inner.1) / 2),
    )
}

/// Final thumbnail pixels.
///
/// With a background the result is a canvas of exactly `size` holding the image
/// centered: RGBA for translucent backgrounds, RGB otherwise. Without one it is the
/// image itself converted to RGB.
pub fn compose(size: (u32, u32), image: &DynamicImage, background: Option<Background>) -> DynamicImage {
    let offset = centered(size, (image.width(), image.height()));
    match background {
        Some(bg) if bg.is_translucent() => {
            let mut canvas = RgbaImage::from_pixel(size.0, size.1, Rgba(bg.to_rgba()));
            imageops::replace(&mut canvas, &image.to_rgba8(), offset.0, offset.1);
            DynamicImage::ImageRgba8(canvas)
        }
        Some(bg) => {
            let mut canvas = RgbImage::from_pixel(size.0, size.1, Rgb(bg.to_rgb()));
            imageops::replace(&mut canvas, &image.to_rgb8(), offset.0, offset.1);
            DynamicImage::ImageRgb8(canvas)
        }
        None => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

/// Progressive JPEG with optimized Huffman tables at `JPEG_QUALITY`
fn write_jpeg(image: &DynamicImage, output_path: &Path) -> MediaMetaResult<()> {
    let rgb = image.to_rgb8();
    let side = |value: u32| {
        u16::try_from(value).map_err(|_| MediaMetaError::ThumbnailExtraction {
            message: format!("{}x{} exceeds the JPEG size limit", rgb.width(), rgb.height()),
        })
    };
    let (width, height) = (side(rgb.width())?, side(rgb.height())?);

    let mut encoder = jpeg_encoder::Encoder::new_file(output_path, JPEG_QUALITY)?;
    encoder.set_progressive(true);
    encoder.set_optimized_huffman_tables(true);
    encoder.encode(rgb.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)?;
    Ok(())
}

/// Encode by the output extension; PNG keeps alpha, JPEG is progressive and optimized
pub fn write_image(image: &DynamicImage, output_path: &Path) -> MediaMetaResult<()> {
    let format = ImageFormat::from_path(output_path).unwrap_or(if image.color().has_alpha() {
        ImageFormat::Png
    } else {
        ImageFormat::Jpeg
    });

    match format {
        ImageFormat::Png => {
            let writer = BufWriter::new(File::create(output_path)?);
            let encoder = PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
            image.write_with_encoder(encoder)?;
        }
        ImageFormat::Jpeg => write_jpeg(image, output_path)?,
        other => image.save_with_format(output_path, other)?,
    }
    debug!(path = %output_path.display(), ?format, "Wrote thumbnail");
    Ok(())
}

/// Composite onto the optional background and write to `output_path`
pub fn pack_and_write(
    size: (u32, u32),
    output_path: &Path,
    image: &DynamicImage,
    background: Option<Background>,
) -> MediaMetaResult<()> {
    write_image(&compose(size, image, background), output_path)
}
