//! Error handling module for MediaMeta

use thiserror::Error;

/// Main error type for MediaMeta operations
#[derive(Error, Debug)]
pub enum MediaMetaError {
    /// No parser is registered for the extension
    #[error("Unsupported extension: '{ext}'. No metadata parser is registered for it")]
    UnsupportedExtension { ext: String },

    /// A collaborator returned a field the coercion rules cannot repair
    #[error("Schema validation failed for field '{field}': expected {expected}, found {found}")]
    SchemaValidation {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// A required track is absent from the probe report
    #[error("Missing {kind} track in {filename}")]
    MissingTrack { kind: &'static str, filename: String },

    /// No representative frame or page could be extracted
    #[error("Thumbnail extraction failed: {message}")]
    ThumbnailExtraction { message: String },

    /// Document library unavailable or failed
    #[error("Document backend error: {message}")]
    DocumentBackend { message: String },

    /// Media probe error
    #[error("Failed to probe media file: {message}")]
    Probe { message: String },

    /// Settings could not be loaded or are invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Progressive JPEG encoding error
    #[error("JPEG encoding error: {0}")]
    Jpeg(#[from] jpeg_encoder::EncodingError),

    /// FFmpeg error
    #[error("FFmpeg error: {0}")]
    FFmpeg(#[from] ffmpeg_next::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MediaMetaError {
    /// Build a schema validation error for `field`
    pub fn schema(field: &str, expected: &'static str, found: impl Into<String>) -> Self {
        MediaMetaError::SchemaValidation {
            field: field.to_string(),
            expected,
            found: found.into(),
        }
    }
}

/// Result type alias for MediaMeta operations
pub type MediaMetaResult<T> = std::result::Result<T, MediaMetaError>;
