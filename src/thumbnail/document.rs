// Document thumbnails - First page rasterized by the document collaborator

use std::sync::Arc;

use ::image::DynamicImage;

use super::ThumbnailGenerator;
use crate::error::MediaMetaResult;
use crate::ports::DocumentPort;
use crate::source::OpenMedia;

pub struct DocumentThumbnailGenerator {
    documents: Arc<dyn DocumentPort>,
}

impl DocumentThumbnailGenerator {
    pub fn new(documents: Arc<dyn DocumentPort>) -> Self {
        Self { documents }
    }
}

impl ThumbnailGenerator for DocumentThumbnailGenerator {
    fn family(&self) -> &'static str {
        "document"
    }

    fn representative_image(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<DynamicImage> {
        self.documents.render_first_page(media)
    }
}
