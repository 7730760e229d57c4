//! Key-value backends for flashdeck
//!
//! Every store persists through an opaque string key-value space. The layout is:
//! - `themes`          JSON array of themes
//! - `cards_<themeId>` JSON array of the cards in one theme
//! - `card_stats`      JSON object mapping card id to `{correct, total}`
//! - `user-language`   raw two-letter language code

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub const THEMES_KEY: &str = "themes";
pub const CARD_STATS_KEY: &str = "card_stats";
pub const LANGUAGE_KEY: &str = "user-language";
pub const CARDS_KEY_PREFIX: &str = "cards_";

/// Key holding the card collection of a theme
pub fn cards_key(theme_id: &str) -> String {
    format!("{}{}", CARDS_KEY_PREFIX, theme_id)
}

/// String key-value storage shared by all stores
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;
}

/// Read and decode a JSON value
///
/// `Ok(None)` when the key is absent. A backend failure is `StorageRead`,
/// malformed JSON is `Corrupt`.
pub fn read_json<T: DeserializeOwned>(backend: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let raw = backend.get(key).map_err(|e| Error::read(key, e))?;
    match raw {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::corrupt(key, e)),
        None => Ok(None),
    }
}

/// Read a value that is about to be modified and written back
///
/// Absent or malformed data starts from `T::default()`. A backend failure is
/// returned so the caller does not overwrite data it could not read.
pub fn read_for_update<T: DeserializeOwned + Default>(
    backend: &dyn KeyValueStore,
    key: &str,
) -> Result<T> {
    match read_json(backend, key) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(e @ Error::Corrupt { .. }) => {
            tracing::warn!(error = %e, "replacing malformed data");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// Encode a value as JSON and store it
pub fn write_json<T: Serialize + ?Sized>(
    backend: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| Error::write(key, e))?;
    backend.set(key, &raw).map_err(|e| Error::write(key, e))
}

fn poisoned(key: &str) -> Error {
    Error::Other(format!("storage lock poisoned while accessing '{}'", key))
}

/// In-memory backend
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned(key))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned(key))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned(key))?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| poisoned("*"))?;
        Ok(entries.keys().cloned().collect())
    }
}

/// File backend: the whole key space as one JSON object
///
/// Loaded once on open and rewritten after every mutation. The in-memory copy is
/// updated first, so a failed write leaves it ahead of the file.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened storage file");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned(key))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned(key))?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned(key))?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| poisoned("*"))?;
        Ok(entries.keys().cloned().collect())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_cards_key() {
        assert_eq!(cards_key("thm-1"), "cards_thm-1");
    }

    #[test]
    fn test_memory_store_basic_ops() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        store.remove("a").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_read_json_absent_and_malformed() {
        let store = MemoryStore::new();
        let absent: Option<Sample> = read_json(&store, "sample").unwrap();
        assert!(absent.is_none());

        store.set("sample", "{not json").unwrap();
        let err = read_json::<Sample>(&store, "sample").unwrap_err();
        assert!(matches!(err, Error::Corrupt { ref key, .. } if key == "sample"));

        let fresh: Vec<u32> = read_for_update(&store, "sample").unwrap();
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_read_for_update_surfaces_backend_failure() {
        let store = testing::FaultyStore::default();
        store.inner.set("sample", "[1,2]").unwrap();
        let loaded: Vec<u32> = read_for_update(&store, "sample").unwrap();
        assert_eq!(loaded, vec![1, 2]);

        store.set_fail_reads(true);
        let err = read_for_update::<Vec<u32>>(&store, "sample").unwrap_err();
        assert!(matches!(err, Error::StorageRead { .. }));
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "x".to_string(),
            count: 3,
        };
        write_json(&store, "sample", &sample).unwrap();
        let loaded: Option<Sample> = read_json(&store, "sample").unwrap();
        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn test_write_json_reports_backend_failure() {
        let store = testing::FaultyStore::default();
        store.set_fail_writes(true);
        let err = write_json(&store, "sample", &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::StorageWrite { .. }));
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("themes", "[]").unwrap();
            store.set("user-language", "en").unwrap();
            store.remove("themes").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("themes").unwrap(), None);
        assert_eq!(store.get("user-language").unwrap().as_deref(), Some("en"));
        assert_eq!(store.keys().unwrap(), vec!["user-language".to_string()]);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[[[").unwrap();
        assert!(matches!(FileStore::open(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_file_store_empty_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
