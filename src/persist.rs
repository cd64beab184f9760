//! Persistence: the document, camera, history, and clipboard survive reload.
//!
//! Storage goes through the [`KeyValue`] trait so the core logic is testable
//! off-wasm; the browser build plugs in `localStorage` via [`LocalStorage`],
//! tests use [`MemoryStore`]. Values are JSON under fixed keys.
//!
//! Loads are forgiving: a missing or malformed value logs a warning and
//! falls back to the default, never failing startup. Saves are defensive
//! about quota: history is by far the largest value, so when writing it
//! overflows storage the save degrades to just the current snapshot, and
//! failing that the history key is dropped while the document itself stays
//! persisted.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::element::Element;
use crate::history::History;

/// Storage keys, namespaced to avoid colliding with anything else the host
/// page keeps in the same store.
pub const KEY_ELEMENTS: &str = "sketchboard:elements";
pub const KEY_CAMERA: &str = "sketchboard:camera";
pub const KEY_HISTORY: &str = "sketchboard:history";
pub const KEY_CLIPBOARD: &str = "sketchboard:clipboard";

/// Why a write failed.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The backend refused the value for size.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Minimal string key-value store.
pub trait KeyValue {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn delete(&mut self, key: &str);
}

/// Load and decode a value, or `None` when absent or malformed.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValue, key: &str) -> Option<T> {
    let raw = store.read(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("discarding malformed value under {key}: {err}");
            None
        }
    }
}

/// Encode and store a value.
pub fn save<T: Serialize>(
    store: &mut dyn KeyValue,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let raw = serde_json::to_string(value).map_err(|e| PersistError::Backend(e.to_string()))?;
    store.write(key, &raw)
}

/// Store the undo history, degrading under quota pressure: full history
/// first, then just a single-snapshot baseline of the current document,
/// then dropping the key entirely.
pub fn save_history(
    store: &mut dyn KeyValue,
    history: &History,
    current: &[Element],
) -> Result<(), PersistError> {
    match save(store, KEY_HISTORY, history) {
        Err(PersistError::QuotaExceeded) => {}
        other => return other,
    }
    log::warn!("history over storage quota, degrading to current snapshot");
    let baseline = History::with_baseline(current.to_vec());
    match save(store, KEY_HISTORY, &baseline) {
        Err(PersistError::QuotaExceeded) => {}
        other => return other,
    }
    log::warn!("snapshot still over quota, dropping persisted history");
    store.delete(KEY_HISTORY);
    Ok(())
}

/// In-memory store for tests, with a switch to refuse writes as over-quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: std::collections::HashMap<String, String>,
    /// Writes longer than this many bytes fail with `QuotaExceeded`.
    pub quota: Option<usize>,
}

impl KeyValue for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        if self.quota.is_some_and(|q| value.len() > q) {
            return Err(PersistError::QuotaExceeded);
        }
        self.map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&mut self, key: &str) {
        self.map.remove(key);
    }
}

/// Browser `localStorage` backend.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// `None` when the page runs without storage access.
    #[must_use]
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().unwrap_or_default()?;
        Some(Self { storage })
    }
}

impl KeyValue for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).unwrap_or_default()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage.set_item(key, value).map_err(|err| {
            let text = format!("{err:?}");
            if text.contains("QuotaExceeded") {
                PersistError::QuotaExceeded
            } else {
                PersistError::Backend(text)
            }
        })
    }

    fn delete(&mut self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            log::warn!("failed to remove {key}: {err:?}");
        }
    }
}
