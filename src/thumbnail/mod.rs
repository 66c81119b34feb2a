//! Thumbnail generation: extension dispatch, representative image extraction,
//! resizing, background compositing and file output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::image::DynamicImage;
use tracing::{error, info, warn};

use crate::app::Backends;
use crate::domain::settings::{Background, ExtensionSettings, ThumbnailSettings, ThumbnailSize};
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::source::{MediaSource, OpenMedia};
use crate::utils::path::PathUtils;

pub mod canvas;
pub mod document;
pub mod image;
pub mod video;

pub use document::DocumentThumbnailGenerator;
pub use image::ImageThumbnailGenerator;
pub use video::VideoThumbnailGenerator;

/// Produces the full-size image a thumbnail is cut from
pub trait ThumbnailGenerator: Send + Sync {
    fn family(&self) -> &'static str;

    fn representative_image(&self, media: &mut OpenMedia<'_>) -> MediaMetaResult<DynamicImage>;
}

/// A written thumbnail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailOutput {
    /// Requested bounding box
    pub size: (u32, u32),
    pub path: PathBuf,
}

/// Per-call options for [`ThumbnailService::generate_thumbnail`]
#[derive(Debug, Clone, Default)]
pub struct ThumbnailRequest<'n> {
    /// Name used for dispatch and the default output name (handles only)
    pub filename: Option<&'n str>,
    pub size: ThumbnailSize,
    /// Overrides the derived output name
    pub output_filename: Option<&'n str>,
    pub background: Option<Background>,
}

/// Output file extension: PNG when the background needs alpha, JPEG otherwise
pub fn output_format(background: Option<Background>) -> &'static str {
    match background {
        Some(bg) if bg.is_translucent() => "png",
        _ => "jpg",
    }
}

/// `<stem><ext with '.' as '_'>_thumb_<size>.<format>`
pub fn thumbnail_filename(filename: &str, size: ThumbnailSize, format: &str) -> String {
    let (stem, ext) = PathUtils::split_ext(PathUtils::basename(filename));
    format!("{}{}_thumb_{}.{}", stem, ext.replace('.', "_"), size, format)
}

/// Extension to generator table plus the configured batch sizes
pub struct ThumbnailService {
    generators: HashMap<String, Arc<dyn ThumbnailGenerator>>,
    sizes: Vec<ThumbnailSize>,
    background: Option<Background>,
}

impl ThumbnailService {
    /// Register generators for video, image and document extensions, in that order
    pub fn new(extensions: &ExtensionSettings, thumbnails: &ThumbnailSettings, backends: &Backends) -> Self {
        let families: [(Arc<dyn ThumbnailGenerator>, &Vec<String>); 3] = [
            (
                Arc::new(VideoThumbnailGenerator::new(Arc::clone(&backends.frames))),
                &extensions.video,
            ),
            (Arc::new(ImageThumbnailGenerator), &extensions.image),
            (
                Arc::new(DocumentThumbnailGenerator::new(Arc::clone(&backends.documents))),
                &extensions.document,
            ),
        ];

        let mut generators = HashMap::new();
        for (generator, exts) in families {
            for ext in exts {
                generators.insert(ext.clone(), Arc::clone(&generator));
            }
        }

        Self {
            generators,
            sizes: thumbnails.sizes.clone(),
            background: thumbnails.background,
        }
    }

    /// Configured batch sizes, in order
    pub fn sizes(&self) -> &[ThumbnailSize] {
        &self.sizes
    }

    /// Configured default background
    pub fn default_background(&self) -> Option<Background> {
        self.background
    }

    pub fn generator_for(&self, ext: &str) -> Option<&Arc<dyn ThumbnailGenerator>> {
        self.generators.get(ext)
    }

    /// Write one thumbnail into `output_dir`.
    ///
    /// The directory is created first, even when no generator is registered for the
    /// extension. An unregistered extension is not an error: it is logged and `None`
    /// is returned.
    pub fn generate_thumbnail(
        &self,
        mut source: MediaSource<'_>,
        output_dir: &Path,
        request: &ThumbnailRequest<'_>,
    ) -> MediaMetaResult<Option<ThumbnailOutput>> {
        let filename = match (&source, request.filename) {
            (MediaSource::Path(_), _) | (_, None) => source.default_name(),
            (MediaSource::Handle(_), Some(name)) => Some(name.to_string()),
        }
        .ok_or_else(|| MediaMetaError::ThumbnailExtraction {
            message: "Cannot determine a filename for the media handle".to_string(),
        })?;

        let format = output_format(request.background);
        let output_name = match request.output_filename {
            Some(name) => name.to_string(),
            None => thumbnail_filename(&filename, request.size, format),
        };
        std::fs::create_dir_all(output_dir)?;
        let output_path = output_dir.join(output_name);

        let ext = PathUtils::extension(&filename);
        let Some(generator) = self.generator_for(ext) else {
            warn!(
                filename = %filename,
                ext = %ext,
                "Generator for extension {} not installed. No thumbnail will be generated.",
                ext
            );
            return Ok(None);
        };

        let size = request.size.dimensions();
        let image = source.with_open(&filename, |media| generator.representative_image(media))?;
        let image = canvas::fit_image(image, size);
        canvas::pack_and_write(size, &output_path, &image, request.background)?;

        info!(
            family = generator.family(),
            size = %request.size,
            path = %output_path.display(),
            "Generated thumbnail"
        );
        Ok(Some(ThumbnailOutput {
            size,
            path: output_path,
        }))
    }

    /// One thumbnail per configured size, in order. Each size is attempted
    /// independently; failures are logged and returned in place.
    pub fn generate_thumbnails(
        &self,
        mut source: MediaSource<'_>,
        output_dir: &Path,
        filename: Option<&str>,
        background: Option<Background>,
    ) -> Vec<MediaMetaResult<Option<ThumbnailOutput>>> {
        self.sizes
            .iter()
            .map(|&size| {
                let request = ThumbnailRequest {
                    filename,
                    size,
                    output_filename: None,
                    background,
                };
                let result = self.generate_thumbnail(source.reborrow(), output_dir, &request);
                if let Err(e) = &result {
                    error!(size = %size, "Thumbnail generation failed: {}", e);
                }
                result
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
