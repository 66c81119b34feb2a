use std::sync::Arc;

use crate::adapters::{
    LibavFrameAdapter, PdfiumDocumentAdapter, ProbeImageAdapter, ProbeLibavAdapter,
    TomlConfigAdapter,
};
use crate::domain::settings::MediaSettings;
use crate::ports::{ConfigPort, DocumentPort, ProbePort, VideoFramePort};
use crate::probe::MediaInspector;
use crate::thumbnail::ThumbnailService;

/// Collaborators shared by parser and thumbnail dispatch
#[derive(Clone)]
pub struct Backends {
    pub av_probe: Arc<dyn ProbePort>,
    pub image_probe: Arc<dyn ProbePort>,
    pub documents: Arc<dyn DocumentPort>,
    pub frames: Arc<dyn VideoFramePort>,
}

impl Backends {
    /// libav, image and pdfium backed collaborators
    pub fn native() -> Self {
        Self {
            av_probe: Arc::new(ProbeLibavAdapter::new()),
            image_probe: Arc::new(ProbeImageAdapter::new()),
            documents: Arc::new(PdfiumDocumentAdapter::new()),
            frames: Arc::new(LibavFrameAdapter::new()),
        }
    }
}

pub trait AppContainer: Send + Sync {
    fn inspector(&self) -> Arc<MediaInspector>;
    fn thumbnails(&self) -> Arc<ThumbnailService>;
    fn settings(&self) -> &MediaSettings;
}

/// Registries built once from settings and shared read-only
pub struct DefaultAppContainer {
    settings: MediaSettings,
    inspector: Arc<MediaInspector>,
    thumbnails: Arc<ThumbnailService>,
    config: Arc<dyn ConfigPort>,
}

impl DefaultAppContainer {
    pub fn new(settings: MediaSettings) -> Self {
        Self::with_backends(settings, Backends::native())
    }

    pub fn with_backends(settings: MediaSettings, backends: Backends) -> Self {
        let inspector = Arc::new(MediaInspector::new(&settings.extensions, &backends));
        let thumbnails = Arc::new(ThumbnailService::new(
            &settings.extensions,
            &settings.thumbnails,
            &backends,
        ));
        Self {
            settings,
            inspector,
            thumbnails,
            config: Arc::new(TomlConfigAdapter::new()),
        }
    }

    pub fn config(&self) -> Arc<dyn ConfigPort> {
        Arc::clone(&self.config)
    }
}

impl AppContainer for DefaultAppContainer {
    fn inspector(&self) -> Arc<MediaInspector> {
        Arc::clone(&self.inspector)
    }

    fn thumbnails(&self) -> Arc<ThumbnailService> {
        Arc::clone(&self.thumbnails)
    }

    fn settings(&self) -> &MediaSettings {
        &self.settings
    }
}
