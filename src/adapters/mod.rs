// Adapters - External system implementations

pub mod document_pdfium;
pub mod frames_libav;
pub mod probe_image;
pub mod probe_libav;
pub mod toml_config;

// Re-export adapters
pub use document_pdfium::PdfiumDocumentAdapter;
pub use frames_libav::LibavFrameAdapter;
pub use probe_image::ProbeImageAdapter;
pub use probe_libav::ProbeLibavAdapter;
pub use toml_config::TomlConfigAdapter;
