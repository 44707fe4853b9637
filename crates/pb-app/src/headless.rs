use std::path::PathBuf;

use anyhow::Result;
use pb_core::palette::Palette;
use pb_core::traits::KeyValueStore;
use pb_export::{DownloadSink, EXPORT_FILE_NAME};

/// Export sans interface : charge la grille sauvegardée, l'encode en PNG et
/// la confie au sink.
///
/// Retourne le chemin écrit, ou `None` si le sink a annulé.
///
/// # Errors
/// Returns an error if encoding or writing the PNG fails.
///
/// # Example
/// ```
/// use pb_app::headless::export_saved;
/// use pb_core::store::MemoryStore;
/// use pb_export::DirectorySink;
///
/// let out = std::env::temp_dir().join("pixelbanner-doc");
/// let path = export_saved(&MemoryStore::default(), &mut DirectorySink::new(&out)).unwrap();
/// assert!(path.unwrap().ends_with("empes_banner.png"));
/// ```
pub fn export_saved(
    store: &dyn KeyValueStore,
    sink: &mut dyn DownloadSink,
) -> Result<Option<PathBuf>> {
    let palette = Palette::default();
    let grid = pb_core::canvas::initialize(store, &palette);
    let bytes = pb_export::export_image(&grid, &palette)?;
    Ok(sink.save(&bytes, EXPORT_FILE_NAME)?)
}
