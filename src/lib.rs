//! MediaMeta Library
//!
//! Normalizes metadata of audio/video, still image and PDF files into typed,
//! serializable records, and renders bounded thumbnails for them. Parsers and
//! thumbnail generators are dispatched on the file extension.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod output;
pub mod ports;
pub mod probe;
pub mod source;
pub mod thumbnail;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use app::{AppContainer, Backends, DefaultAppContainer};
pub use domain::model::{
    DocumentInfo, FileInfoRecord, ImageFileInfo, MediaFileInfo, PdfFileInfo, VideoFileInfo,
};
pub use domain::settings::{Background, MediaSettings, ThumbnailSize};
pub use error::{MediaMetaError, MediaMetaResult};
pub use probe::MediaInspector;
pub use source::{MediaHandle, MediaSource, NamedHandle};
pub use thumbnail::{ThumbnailOutput, ThumbnailRequest, ThumbnailService};

/// Initialize the native media libraries
pub fn init() -> MediaMetaResult<()> {
    ffmpeg_next::init()?;
    Ok(())
}
