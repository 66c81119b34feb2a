// Image thumbnails - Decode the still image as is

use std::io::Cursor;

use ::image::{DynamicImage, ImageReader};

use super::ThumbnailGenerator;
use crate::error::MediaMetaResult;
use crate::source::OpenMedia;

pub struct ImageThumbnailGenerator;

impl ThumbnailGenerator for ImageThumbnailGenerator {
    fn family(&self) -> &'static str {
        "image"
    }

    fn representative_image(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<DynamicImage> {
        let bytes = media.read_all()?;
        Ok(ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?)
    }
}
