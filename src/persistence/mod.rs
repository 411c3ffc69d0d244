//! Key-value persistence for preferences and the high score
//!
//! Features:
//! - String keys, JSON-encoded string values (LocalStorage shaped)
//! - In-memory store for tests and ephemeral runs
//! - JSON file store for native builds, rewritten on every `set`

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage key for the mute flag and start defaults
pub const SETTINGS_KEY: &str = "brickfall_settings";
/// Storage key for the best score
pub const HIGH_SCORE_KEY: &str = "brickfall_highscore";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON value. Missing keys give `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key) {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode a value as JSON and write it
pub fn save_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Whole store kept as one JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open (or lazily create) a store file. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        log::info!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("brickfall-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store_json_helpers() {
        let mut store = MemoryStore::new();
        assert_eq!(load_json::<u64>(&store, HIGH_SCORE_KEY).unwrap(), None);
        save_json(&mut store, HIGH_SCORE_KEY, &42u64).unwrap();
        assert_eq!(load_json::<u64>(&store, HIGH_SCORE_KEY).unwrap(), Some(42));
    }

    #[test]
    fn test_malformed_value_is_json_error() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "not json").unwrap();
        let err = load_json::<u64>(&store, HIGH_SCORE_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            assert!(store.get(SETTINGS_KEY).is_none());
            store.set(SETTINGS_KEY, "{\"muted\":true}").unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(SETTINGS_KEY).as_deref(), Some("{\"muted\":true}"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let path = temp_path("corrupt");
        fs::write(&path, "{{{").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
