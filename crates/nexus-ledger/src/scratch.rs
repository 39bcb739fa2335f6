//! # Scratch Store
//!
//! A tiny local key/value store for unsaved form state. One string per key,
//! overwritten on every write.
//!
//! | Implementation       | Backing                        | Used by          |
//! |----------------------|--------------------------------|------------------|
//! | `FileScratchStore`   | `<dir>/<key>.json`             | report binary    |
//! | `MemoryScratchStore` | `Mutex<HashMap<String,String>>`| tests, embedders |

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

/// Get/set/remove of one string under a key.
pub trait ScratchStore: Send + Sync {
    fn get(&self, key: &str) -> LedgerResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> LedgerResult<()>;
    fn remove(&self, key: &str) -> LedgerResult<()>;
}

// =============================================================================
// File-backed
// =============================================================================

/// Stores each key as a file under `dir`.
#[derive(Debug, Clone)]
pub struct FileScratchStore {
    dir: PathBuf,
}

impl FileScratchStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileScratchStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> LedgerResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LedgerError::Scratch(format!("invalid key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl ScratchStore for FileScratchStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LedgerError::Scratch(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| LedgerError::Scratch(e.to_string()))?;
        std::fs::write(&path, value).map_err(|e| LedgerError::Scratch(e.to_string()))?;
        debug!(?path, bytes = value.len(), "Scratch entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LedgerError::Scratch(e.to_string())),
        }
    }
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryScratchStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryScratchStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panicked writer cannot leave a half-written String behind.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ScratchStore for MemoryScratchStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nexus-scratch-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir("round-trip");
        let store = FileScratchStore::new(&dir);

        assert_eq!(store.get("invoice_draft").unwrap(), None);
        store.set("invoice_draft", "{\"notes\":\"a\"}").unwrap();
        store.set("invoice_draft", "{\"notes\":\"b\"}").unwrap();
        assert_eq!(
            store.get("invoice_draft").unwrap().as_deref(),
            Some("{\"notes\":\"b\"}")
        );
        assert!(dir.join("invoice_draft.json").exists());

        store.remove("invoice_draft").unwrap();
        store.remove("invoice_draft").unwrap();
        assert_eq!(store.get("invoice_draft").unwrap(), None);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let store = FileScratchStore::new(temp_dir("keys"));
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryScratchStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
