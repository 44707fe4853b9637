use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::CoreError;
use crate::traits::KeyValueStore;

/// Stockage sur disque : chaque clé est un fichier `<key>.json` dans `dir`.
///
/// L'écriture passe par un fichier temporaire renommé, pour qu'un arrêt
/// brutal ne laisse jamais une grille tronquée.
///
/// # Example
/// ```no_run
/// use pb_core::store::FileStore;
/// use pb_core::traits::KeyValueStore;
/// let mut store = FileStore::new("data");
/// store.set("pixels", "[0,0]").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CoreError::Store {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let wrap = |source| CoreError::Store {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(wrap)?;
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(wrap)?;
        std::fs::rename(&tmp, &target).map_err(wrap)?;
        log::debug!("{} octets écrits dans {}", value.len(), target.display());
        Ok(())
    }
}

/// Stockage volatil, pour les tests et le mode `--ephemeral`.
///
/// # Example
/// ```
/// use pb_core::store::MemoryStore;
/// use pb_core::traits::KeyValueStore;
/// let mut store = MemoryStore::default();
/// store.set("k", "v").unwrap();
/// assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get("pixels").unwrap().is_none());
    }

    #[test]
    fn file_store_roundtrip_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = FileStore::new(&nested);
        store.set("pixels", "[1,2,3]").unwrap();
        store.set("pixels", "[4]").unwrap();
        assert_eq!(store.get("pixels").unwrap().as_deref(), Some("[4]"));
        assert!(nested.join("pixels.json").exists());
        assert!(!nested.join("pixels.json.tmp").exists());
    }

    #[test]
    fn file_store_unreadable_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as a string.
        std::fs::create_dir(dir.path().join("pixels.json")).unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.get("pixels"),
            Err(CoreError::Store { .. })
        ));
    }
}
