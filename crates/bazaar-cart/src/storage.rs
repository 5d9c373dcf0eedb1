//! Key-value storage backends for the cart

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CartError;

/// Synchronous key-value storage, the browser-local-storage analogue.
///
/// Operations are treated as instantaneous by callers; implementations
/// must not block on anything slower than local disk. Concurrent writers
/// to the same key are last-write-wins by design.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value under `key`, `None` if unset
    fn read(&self, key: &str) -> Result<Option<String>, CartError>;

    /// Overwrite the value under `key` atomically
    fn write(&self, key: &str, value: &str) -> Result<(), CartError>;

    /// Remove a key, returning whether it existed
    fn delete(&self, key: &str) -> Result<bool, CartError>;

    /// List all stored keys
    fn keys(&self) -> Result<Vec<String>, CartError>;
}

/// In-memory storage for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CartError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CartError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, CartError> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, CartError> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// File-backed storage, one JSON file per key under a base directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, CartError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Keys become file names, so anything path-like is rejected
    fn path_for(&self, key: &str) -> Result<PathBuf, CartError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CartError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CartError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CartError::Io(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CartError> {
        let path = self.path_for(key)?;

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, CartError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CartError::Io(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, CartError> {
        let mut keys = Vec::new();
        for item in std::fs::read_dir(&self.dir)? {
            let path = item?.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.read("cart").unwrap().is_none());

        storage.write("cart", "[]").unwrap();
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.keys().unwrap(), vec!["cart"]);

        assert!(storage.delete("cart").unwrap());
        assert!(!storage.delete("cart").unwrap());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = FileStorage::new(dir.path()).unwrap();
            storage.write("cart", "[1,2]").unwrap();
        }

        let storage = FileStorage::new(dir.path()).unwrap();
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(storage.keys().unwrap(), vec!["cart"]);
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(matches!(
            storage.write("../escape", "x"),
            Err(CartError::InvalidKey(_))
        ));
        assert!(matches!(storage.read(""), Err(CartError::InvalidKey(_))));
    }
}
