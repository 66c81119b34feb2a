// Parser registry - Extension dispatch for metadata parsing

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::{DocumentParser, FileNames, GenericParser, ImageParser, MediaInfoParser, VideoParser};
use crate::app::Backends;
use crate::domain::model::FileInfoRecord;
use crate::domain::settings::ExtensionSettings;
use crate::error::{MediaMetaError, MediaMetaResult};
use crate::source::MediaSource;
use crate::utils::path::PathUtils;

/// Extension to parser table, built once and read-only afterwards
pub struct MediaInspector {
    parsers: HashMap<String, Arc<dyn MediaInfoParser>>,
}

impl MediaInspector {
    /// Register parsers in the order media, video, image, document, extra.
    /// An extension listed twice ends up with the later family's parser.
    pub fn new(extensions: &ExtensionSettings, backends: &Backends) -> Self {
        let families: [(Arc<dyn MediaInfoParser>, &Vec<String>); 5] = [
            (Arc::new(GenericParser::media()), &extensions.media),
            (Arc::new(VideoParser::new(Arc::clone(&backends.av_probe))), &extensions.video),
            (Arc::new(ImageParser::new(Arc::clone(&backends.image_probe))), &extensions.image),
            (Arc::new(DocumentParser::new(Arc::clone(&backends.documents))), &extensions.document),
            (Arc::new(GenericParser::extra()), &extensions.extra),
        ];

        let mut parsers = HashMap::new();
        for (parser, exts) in families {
            for ext in exts {
                parsers.insert(ext.clone(), Arc::clone(&parser));
            }
        }
        debug!(extensions = parsers.len(), "Built parser registry");
        Self { parsers }
    }

    /// Parser registered for an extension, matched case-sensitively
    pub fn parser_for(&self, ext: &str) -> Option<&Arc<dyn MediaInfoParser>> {
        self.parsers.get(ext)
    }

    pub fn supports(&self, filename: &str) -> bool {
        self.parser_for(PathUtils::extension(filename)).is_some()
    }

    /// Parse a file into its normalized record.
    ///
    /// Path sources are named by the path itself. Handles use `filename`, then the
    /// handle's own name. `original_filename` defaults to the basename.
    pub fn get_media_info(
        &self,
        mut source: MediaSource<'_>,
        filename: Option<&str>,
        original_filename: Option<&str>,
    ) -> MediaMetaResult<FileInfoRecord> {
        let filename = match (&source, filename) {
            (MediaSource::Path(_), _) | (_, None) => source.default_name(),
            (MediaSource::Handle(_), Some(name)) => Some(name.to_string()),
        }
        .ok_or_else(|| MediaMetaError::Probe {
            message: "Cannot determine a filename for the media handle".to_string(),
        })?;

        let ext = PathUtils::extension(&filename);
        let parser = self
            .parser_for(ext)
            .ok_or_else(|| MediaMetaError::UnsupportedExtension {
                ext: ext.to_string(),
            })?;

        let names = FileNames::new(filename.as_str(), original_filename);
        info!(
            filename = %names.original_filename,
            family = parser.family(),
            "Parsing media file"
        );
        source.with_open(&filename, |media| parser.parse(media, &names))
    }
}
