use std::path::PathBuf;

use thiserror::Error;

/// Errors originating from the export module.
#[derive(Error, Debug)]
pub enum ExportError {
    /// PNG encoding failed.
    #[error("Encodage PNG impossible : {0}")]
    Encode(#[from] image::ImageError),

    /// The raster does not match its declared dimensions.
    #[error("Raster incohérent : {width}×{height}")]
    Raster {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Writing the exported file failed.
    #[error("Écriture de {path} impossible : {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
