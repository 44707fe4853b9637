/// PNG export for pixelbanner.
///
/// Rasterizes the grid one pixel per cell, encodes it, and hands the bytes to
/// a download sink.
pub mod download;
pub mod error;
pub mod png;

pub use download::{DirectorySink, DownloadSink, write_file};
pub use error::ExportError;
pub use png::{EXPORT_FILE_NAME, export_image};
