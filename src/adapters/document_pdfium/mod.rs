// Document pdfium adapter - PDF metadata and rasterization using pdfium

use std::sync::OnceLock;

use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::{
    PdfDocument, PdfDocumentMetadataTagType, PdfRenderConfig, Pdfium, PdfiumError,
};
use tracing::{debug, warn};

use crate::domain::rules::RawFields;
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::ports::DocumentPort;
use crate::source::OpenMedia;

/// Rasterization resolution for page thumbnails
const RENDER_DPI: f32 = 200.0;
/// PDF user space units per inch
const POINTS_PER_INCH: f32 = 72.0;

const METADATA_TAGS: [(PdfDocumentMetadataTagType, &str); 7] = [
    (PdfDocumentMetadataTagType::Author, "author"),
    (PdfDocumentMetadataTagType::Creator, "creator"),
    (PdfDocumentMetadataTagType::Producer, "producer"),
    (PdfDocumentMetadataTagType::Subject, "subject"),
    (PdfDocumentMetadataTagType::Title, "title"),
    (PdfDocumentMetadataTagType::CreationDate, "creation_date"),
    (PdfDocumentMetadataTagType::ModificationDate, "modification_date"),
];

/// pdfium-backed document collaborator.
///
/// The pdfium library is bound on first use. When it cannot be found every call
/// fails with [`MediaMetaError::DocumentBackend`] instead of aborting startup.
pub struct PdfiumDocumentAdapter {
    pdfium: OnceLock<Option<Pdfium>>,
}

impl PdfiumDocumentAdapter {
    pub fn new() -> Self {
        Self {
            pdfium: OnceLock::new(),
        }
    }

    fn pdfium(&self) -> MediaMetaResult<&Pdfium> {
        self.pdfium
            .get_or_init(|| {
                Pdfium::bind_to_system_library()
                    .map(Pdfium::new)
                    .map_err(|e| warn!("pdfium library unavailable: {:?}", e))
                    .ok()
            })
            .as_ref()
            .ok_or_else(|| MediaMetaError::DocumentBackend {
                message: "pdfium library is not available".to_string(),
            })
    }

    fn load<'a>(pdfium: &'a Pdfium, bytes: &'a [u8]) -> MediaMetaResult<PdfDocument<'a>> {
        pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(backend_error)
    }
}

impl Default for PdfiumDocumentAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentPort for PdfiumDocumentAdapter {
    fn read_document(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<RawFields> {
        let pdfium = self.pdfium()?;
        let bytes = media.read_all()?;
        let document = Self::load(pdfium, &bytes)?;

        let mut fields = RawFields::new();
        fields.insert("pages", u32::from(document.pages().len()));
        let metadata = document.metadata();
        for (tag, key) in METADATA_TAGS {
            fields.insert_opt(key, metadata.get(tag).map(|entry| entry.value().to_string()));
        }
        debug!(keys = ?fields.keys().collect::<Vec<_>>(), "Read document metadata");
        Ok(fields)
    }

    fn render_first_page(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<DynamicImage> {
        let pdfium = self.pdfium()?;
        let bytes = media.read_all()?;
        let document = Self::load(pdfium, &bytes)?;
        let page = document.pages().first().map_err(|e| MediaMetaError::ThumbnailExtraction {
            message: format!("Document has no first page: {:?}", e),
        })?;

        let config = PdfRenderConfig::new().scale_page_by_factor(RENDER_DPI / POINTS_PER_INCH);
        let bitmap = page.render_with_config(&config).map_err(backend_error)?;

        let width = u32::try_from(bitmap.width()).unwrap_or(0);
        let height = u32::try_from(bitmap.height()).unwrap_or(0);
        let canvas = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
            MediaMetaError::DocumentBackend {
                message: format!("Rendered bitmap does not match {}x{}", width, height),
            }
        })?;
        Ok(DynamicImage::ImageRgba8(canvas))
    }
}

fn backend_error(error: PdfiumError) -> MediaMetaError {
    MediaMetaError::DocumentBackend {
        message: format!("{:?}", error),
    }
}
