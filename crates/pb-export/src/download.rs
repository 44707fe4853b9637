use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// Destination d'un fichier exporté (« téléchargement » côté client).
///
/// Implémenté par : `DirectorySink` (écriture directe) et, côté application,
/// une boîte de dialogue d'enregistrement.
pub trait DownloadSink {
    /// Enregistre `bytes` sous le nom suggéré `file_name`.
    ///
    /// Retourne le chemin écrit, ou `None` si l'utilisateur a annulé.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    fn save(&mut self, bytes: &[u8], file_name: &str) -> Result<Option<PathBuf>, ExportError>;
}

/// Écrit les exports dans un dossier fixe, en écrasant le fichier précédent.
///
/// # Example
/// ```no_run
/// use pb_export::{DirectorySink, DownloadSink};
/// let mut sink = DirectorySink::new(".");
/// let written = sink.save(b"...", "empes_banner.png").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`, created on demand.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Écrit `bytes` dans `path`, en créant les dossiers parents.
///
/// # Errors
/// Returns an error if the directory or the file cannot be written.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let wrap = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::write(path, bytes).map_err(wrap)
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, bytes: &[u8], file_name: &str) -> Result<Option<PathBuf>, ExportError> {
        let path = self.dir.join(file_name);
        write_file(&path, bytes)?;
        log::info!("Export écrit : {}", path.display());
        Ok(Some(path))
    }
}
