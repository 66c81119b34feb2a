//! Common utilities and helpers

pub mod logging;
pub mod path;

pub use logging::{init_logging, LogFormat, LogLevel};
pub use path::PathUtils;
