//! Durable key-value storage used for client-side state

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::error::{AppError, AppResult};

/// String key-value store with `localStorage` semantics
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    fn remove_item(&self, key: &str) -> AppResult<()>;
}

/// In-process storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> AppResult<MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| AppError::Internal("Memory storage lock poisoned".to_string()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.items()?.remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a crash leaves either the old or the new content. A file that
/// no longer parses is moved aside to `*.json.corrupt` on the next write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> AppResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under the storage lock
    fn update<F>(&self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AppError::Internal("File storage lock poisoned".to_string()))?;

        let mut items = match self.read_all() {
            Ok(items) => items,
            Err(AppError::Serialization(e)) => {
                let backup = self.path.with_extension("json.corrupt");
                std::fs::rename(&self.path, &backup)?;
                tracing::warn!(
                    "Local storage file {} is corrupt, moved to {} and starting over: {}",
                    self.path.display(),
                    backup.display(),
                    e
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut items);
        self.write_all(&items)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AppError::Internal("File storage lock poisoned".to_string()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
        .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", key, e)))
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.update(|items| {
            items.remove(key);
        })
        .map_err(|e| AppError::Storage(format!("Failed to remove {}: {}", key, e)))
    }
}
