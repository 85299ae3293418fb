//! Durable per-session record of edits awaiting commit.
//!
//! Each token gets one [`PendingChange`] the first time it is edited; later
//! edits to the same token update `current` in place and the original value
//! is pinned for revert. The store is read-modify-written wholesale on every
//! change and cleared wholesale on discard or commit success. Store failures
//! are logged and degrade to an empty session, never an error the editing
//! path has to handle.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use log::warn;
use serde::{Deserialize, Serialize};

/// One edited token: what it was when the session first touched it, and what
/// it is now.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub variable: String,
    pub original: String,
    pub current: String,
}

/// Wholesale load/save of the session's pending changes.
pub trait ChangeStore: Send {
    fn load(&self) -> HashMap<String, PendingChange>;
    fn save(&self, changes: &HashMap<String, PendingChange>);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, PendingChange>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeStore for MemoryStore {
    fn load(&self) -> HashMap<String, PendingChange> {
        self.inner.lock().unwrap().clone()
    }

    fn save(&self, changes: &HashMap<String, PendingChange>) {
        *self.inner.lock().unwrap() = changes.clone();
    }
}

/// JSON file store; the durable equivalent of the in-page session storage.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChangeStore for JsonFileStore {
    fn load(&self) -> HashMap<String, PendingChange> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            // Missing file is just an empty session.
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&text) {
            Ok(changes) => changes,
            Err(err) => {
                warn!("session store {:?} is unreadable, starting empty: {err}", self.path);
                HashMap::new()
            }
        }
    }

    fn save(&self, changes: &HashMap<String, PendingChange>) {
        let text = match serde_json::to_string_pretty(changes) {
            Ok(text) => text,
            Err(err) => {
                warn!("session store serialization failed: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, text) {
            warn!("session store {:?} could not be written: {err}", self.path);
        }
    }
}

/// The session facade the editing UI talks to.
pub struct SessionChanges {
    store: Box<dyn ChangeStore>,
}

impl SessionChanges {
    pub fn new(store: Box<dyn ChangeStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Records an edit. The first edit of a token pins `original`; later
    /// edits only move `current`.
    pub fn record_edit(&self, variable: &str, original: &str, value: &str) {
        let mut all = self.store.load();
        all.entry(variable.to_string())
            .and_modify(|change| change.current = value.to_string())
            .or_insert_with(|| PendingChange {
                variable: variable.to_string(),
                original: original.to_string(),
                current: value.to_string(),
            });
        self.store.save(&all);
    }

    /// Pending changes, ordered by variable name for stable display.
    pub fn pending(&self) -> Vec<PendingChange> {
        let mut changes: Vec<_> = self.store.load().into_values().collect();
        changes.sort_by(|a, b| a.variable.cmp(&b.variable));
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.store.load().is_empty()
    }

    /// Drops every pending change after a successful commit.
    pub fn clear(&self) {
        self.store.save(&HashMap::new());
    }

    /// User-initiated discard of the whole session.
    pub fn discard_all(&self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_edit_pins_original_later_edits_move_current() {
        let session = SessionChanges::in_memory();
        session.record_edit("--fg", "#111", "#222");
        session.record_edit("--fg", "should-not-matter", "#333");

        let pending = session.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].original, "#111");
        assert_eq!(pending[0].current, "#333");
    }

    #[test]
    fn clear_empties_the_store() {
        let session = SessionChanges::in_memory();
        session.record_edit("--fg", "#111", "#222");
        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn json_file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let session = SessionChanges::new(Box::new(JsonFileStore::new(&path)));
            session.record_edit("--space-4", "16px", "20px");
        }

        let session = SessionChanges::new(Box::new(JsonFileStore::new(&path)));
        let pending = session.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].variable, "--space-4");
        assert_eq!(pending[0].current, "20px");
    }

    #[test]
    fn corrupt_store_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let session = SessionChanges::new(Box::new(JsonFileStore::new(&path)));
        assert!(session.is_empty());
    }
}
