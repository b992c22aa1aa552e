//! Thread persistence port
//!
//! Stands in for browser local storage: one string value per storage scope,
//! under a fixed key. The panel logs and swallows every `StorageError`.

use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key the thread identifier is persisted under
pub const THREAD_STORAGE_KEY: &str = "wescu_chat_session_v1";

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage is corrupt: {0}")]
    Corrupt(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Load/save/clear of the persisted thread identifier
pub trait ThreadStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, thread_id: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory store; share it through an `Arc` to survive a remount
#[derive(Debug, Default)]
pub struct MemoryThreadStore {
    slot: Mutex<Option<String>>,
}

impl MemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a thread identifier
    pub fn with_thread(thread_id: &str) -> Self {
        Self {
            slot: Mutex::new(Some(thread_id.to_string())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, StorageError> {
        self.slot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl ThreadStore for MemoryThreadStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, thread_id: &str) -> Result<(), StorageError> {
        *self.lock()? = Some(thread_id.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.lock()? = None;
        Ok(())
    }
}

/// JSON file holding a key/value map, one file per storage scope.
///
/// Other keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileThreadStore {
    path: PathBuf,
    key: String,
}

impl FileThreadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: THREAD_STORAGE_KEY.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::Corrupt("expected a JSON object".to_string())),
            Err(e) => Err(StorageError::Corrupt(e.to_string())),
        }
    }

    fn write_map(&self, map: Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        // Atomic replace
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ThreadStore for FileThreadStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let map = self.read_map()?;
        Ok(map
            .get(&self.key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn save(&self, thread_id: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        map.insert(self.key.clone(), Value::String(thread_id.to_string()));
        self.write_map(map)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        if map.remove(&self.key).is_some() {
            self.write_map(map)?;
        }
        Ok(())
    }
}
