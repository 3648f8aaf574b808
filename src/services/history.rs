//! Diagram history and autosave.
//!
//! A bounded ring of the most recent diagram versions, newest first, plus a
//! single autosave slot. Both live in the key-value store and are strictly
//! best-effort: a failed write costs a history entry, never an operation.

use serde::{Deserialize, Serialize};

use crate::state::now_ms;
use crate::storage::KvStore;

pub const HISTORY_KEY: &str = "history";
pub const AUTOSAVE_KEY: &str = "autosave";
pub const AUTOSAVE_TIME_KEY: &str = "autosave-time";

/// Newest-first history, capped at this many entries.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub code: String,
    pub ts: i64,
}

/// Load the history, newest first. Missing or unreadable blobs read as empty.
#[must_use]
pub fn load(store: &dyn KvStore) -> Vec<HistoryEntry> {
    store
        .get(HISTORY_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Prepend `code` to the history unless it already sits at the head, then
/// truncate to [`HISTORY_LIMIT`].
pub fn record(store: &dyn KvStore, code: &str) {
    let mut entries = load(store);
    if entries.first().is_some_and(|head| head.code == code) {
        return;
    }
    entries.insert(0, HistoryEntry { code: code.to_owned(), ts: now_ms() });
    entries.truncate(HISTORY_LIMIT);
    if let Ok(raw) = serde_json::to_string(&entries) {
        store.set(HISTORY_KEY, &raw);
    }
}

/// Overwrite the autosave slot and stamp the save time.
pub fn autosave(store: &dyn KvStore, code: &str) {
    store.set(AUTOSAVE_KEY, code);
    store.set(AUTOSAVE_TIME_KEY, &now_ms().to_string());
}

/// Autosaved document, if one exists.
#[must_use]
pub fn load_autosave(store: &dyn KvStore) -> Option<String> {
    store.get(AUTOSAVE_KEY)
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
