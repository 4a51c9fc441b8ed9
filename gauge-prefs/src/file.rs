//! JSON file store: one file per key under a data directory

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use crate::{PreferenceStore, StoreError};

/// Directory name used under the platform data directory
const APP_DIR: &str = "gauge";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<platform data dir>/gauge`, if the platform has one
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io { path: path.to_path_buf(), source }
}

impl PreferenceStore for FileStore {
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        // Write then rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "preferences written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("prefs").unwrap(), None);
        store.set("prefs", "{\"category\":\"volume\"}").unwrap();
        assert_eq!(store.get("prefs").unwrap().as_deref(), Some("{\"category\":\"volume\"}"));
        assert!(dir.path().join("nested").join("prefs.json").exists());

        store.remove("prefs").unwrap();
        assert_eq!(store.get("prefs").unwrap(), None);
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
        assert!(!dir.path().join("k.json.tmp").exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.set("../escape", "x"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileStore::new(dir.path()).remove("nothing").is_ok());
    }
}
