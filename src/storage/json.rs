//! JSON file-based key-value store.
//!
//! This module provides a human-readable storage implementation: every key lives
//! in one JSON object on disk, rewritten with an atomic write (write-to-temp +
//! rename) on each mutation so a crash never leaves a half-written file.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - the file is loaded into memory once
//! - **Write**: O(n) - the whole map is serialized on every mutation
//! - **Best for**: a handful of keys with small values (favorites, preferences)

use crate::domain::error::{CatalogError, Result};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSON storage container format.
///
/// Values are stored as strings, mirroring browser-style profile storage where
/// each key holds its own serialized document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the container format.
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "marquee-favorites": "[{\"id\":42,\"title\":\"Dune\"}]",
///     "marquee-last-search": "dune",
///     "marquee-theme": "dark"
///   }
/// }
/// ```
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the file, loaded on creation.
    data: Mutex<StorageData>,
}

impl JsonFileStore {
    /// Creates or opens a JSON store.
    ///
    /// If the file exists it is loaded. A file that cannot be parsed is treated
    /// as empty (and logged) rather than failing the session, since stored
    /// values carry no schema version. Parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or an
    /// existing file cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use marquee::storage::JsonFileStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonFileStore::open(PathBuf::from("/tmp/marquee/store.json"))?;
    /// # Ok::<(), marquee::CatalogError>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StorageData::default()
        };

        tracing::debug!(entry_count = data.entries.len(), "store opened");

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        match serde_json::from_str::<StorageData>(&contents) {
            Ok(data) => {
                tracing::debug!(version = data.version, entries = data.entries.len(), "loaded store data");
                Ok(data)
            }
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "store file is malformed, starting empty");
                Ok(StorageData::default())
            }
        }
    }

    /// Writes the map to disk using write-to-temp + rename.
    fn save_to_file(&self, data: &StorageData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| CatalogError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StorageData>> {
        self.data
            .lock()
            .map_err(|e| CatalogError::Storage(format!("store lock poisoned: {e}")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_set", key = %key, len = value.len()).entered();

        let mut data = self.lock()?;
        data.entries.insert(key.to_string(), value.to_string());
        self.save_to_file(&data)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_remove", key = %key).entered();

        let mut data = self.lock()?;
        if data.entries.remove(key).is_none() {
            tracing::trace!("key absent, skipping save");
            return Ok(());
        }
        self.save_to_file(&data)
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}
