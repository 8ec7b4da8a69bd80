//! Persisted client state
//!
//! A tiny string key-value store that survives restarts. It holds the
//! selected data mode and the bearer token, nothing else. Every write is
//! flushed to disk before returning.

use crate::error::{ImsError, IoResultExt, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Key holding the persisted data mode
pub const DATA_MODE_KEY: &str = "dataMode";

/// Key holding the persisted bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// String key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, persisting it before returning
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON-file backed store
pub struct FileStore {
    /// Storage path
    path: PathBuf,
    /// In-memory copy of the file
    cache: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or create) a store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_path(parent)?;
            }
        }

        let entries = if path.exists() {
            let content = fs::read_to_string(&path).with_path(&path)?;
            // A corrupt state file falls back to defaults rather than blocking startup
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable state file {:?}: {}", path, e);
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(entries),
        })
    }

    /// Default location under the platform data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("telecom-ims")
            .join("state.json")
    }

    /// Storage path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content).with_path(&self.path)
    }

    fn poisoned() -> ImsError {
        ImsError::config("state store lock poisoned")
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut cache = self.cache.write().map_err(|_| Self::poisoned())?;
        cache.insert(key.to_string(), value.to_string());
        self.save(&cache)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut cache = self.cache.write().map_err(|_| Self::poisoned())?;
        if cache.remove(key).is_some() {
            self.save(&cache)?;
        }
        Ok(())
    }
}

/// Volatile store, for tests and one-shot runs
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| ImsError::config("state store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| ImsError::config("state store lock poisoned"))?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = FileStore::open(&path).unwrap();
        store.set(DATA_MODE_KEY, "live").unwrap();
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        store.remove(AUTH_TOKEN_KEY).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(DATA_MODE_KEY).as_deref(), Some("live"));
        assert_eq!(reopened.get(AUTH_TOKEN_KEY), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(DATA_MODE_KEY), None);

        store.set(DATA_MODE_KEY, "mock").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"dataMode\": \"mock\""));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::with_entries([(DATA_MODE_KEY, "live")]);
        assert_eq!(store.get(DATA_MODE_KEY).as_deref(), Some("live"));
        store.remove(DATA_MODE_KEY).unwrap();
        assert_eq!(store.get(DATA_MODE_KEY), None);
    }
}
