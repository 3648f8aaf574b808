//! Key-value persistence — the localStorage analog.
//!
//! DESIGN
//! ======
//! The editor persists flat blobs (AI config, history list, auto-save) under
//! string keys. Both operations are synchronous and best-effort: a failed
//! write is logged and swallowed, never surfaced to the caller, and there is
//! no transactional guarantee across keys.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

/// Best-effort key-value store. Per-call atomic, no cross-key transactions.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

// =============================================================================
// FILE STORE
// =============================================================================

/// One file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            warn!(key, error = %e, "kv: write failed, value dropped");
        }
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-memory store for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().ok().and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(key.to_owned(), value.to_owned());
        }
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
