//! Durable client-local key/value storage.
//!
//! This module provides the `Storage` trait backing the session store and
//! the startup integrity sweep, with two implementations:
//! - `FileStorage`: one file per entry under a storage directory
//! - `MemoryStorage`: in-process map for tests and embedders without a filesystem
//!
//! Entries are raw strings. Values that begin with `{` or `[` are treated as
//! JSON-shaped and are validated by the integrity sweep.

pub mod integrity;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};

pub use integrity::sweep;

/// Key/value storage for small durable entries.
pub trait Storage: Send + Sync {
    /// Read an entry, returning `None` if it does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write an entry, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove an entry. Removing a missing entry is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Enumerate all entry keys.
    fn keys(&self) -> Result<Vec<String>>;
}

/// File-backed storage: each entry is a file named after its key.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage entry: {}", key))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.entry_path(key), value)
            .with_context(|| format!("Failed to write storage entry: {}", key))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove storage entry: {}", key))?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list storage directory: {}", self.dir.display()))?;
        for entry in entries {
            let entry = entry.context("Failed to read storage directory entry")?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                if let Some(name) = entry.file_name().to_str() {
                    keys.push(name.to_string());
                }
            }
        }
        Ok(keys)
    }
}

/// In-memory storage for tests and hosts without a durable layer.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("Storage mutex poisoned"))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path().to_path_buf()).expect("Failed to create storage");

        assert_eq!(storage.get("token").unwrap(), None);
        storage.set("token", "abc123").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc123"));

        storage.set("token", "def456").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("def456"));
    }

    #[test]
    fn test_file_storage_remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path().to_path_buf()).expect("Failed to create storage");

        storage.set("token", "abc").unwrap();
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);

        // Removing again is fine
        storage.remove("token").unwrap();
    }

    #[test]
    fn test_file_storage_keys() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path().to_path_buf()).expect("Failed to create storage");

        storage.set("token", "abc").unwrap();
        storage.set("theme", "dark").unwrap();

        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["theme".to_string(), "token".to_string()]);
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set("x", "1").unwrap();
        assert_eq!(storage.get("x").unwrap().as_deref(), Some("1"));
        storage.remove("x").unwrap();
        assert_eq!(storage.get("x").unwrap(), None);
        storage.remove("x").unwrap();
    }
}
