//! Saving and restoring the game.
//!
//! The whole [`GameState`] is written as one JSON blob under a fixed key.
//! Loading is forgiving: saved top-level fields are merged over a fresh
//! state, and anything unreadable falls back to defaults with a warning so
//! the game always starts.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use krishi_ledger::{AuditResult, Ledger};
use krishi_types::LedgerReason;

use crate::config::GameConfig;
use crate::state::GameState;

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The state could not be encoded or decoded.
    #[error("state JSON is invalid: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// A key-value store for serialized game state.
pub trait StateStorage: Send + Sync {
    /// Read the blob stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// File storage
// ---------------------------------------------------------------------------

/// One JSON file per key in a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`, creating it on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, blob).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }
}

// ---------------------------------------------------------------------------
// Memory storage
// ---------------------------------------------------------------------------

/// In-process storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a blob without going through the trait.
    pub fn get(&self, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), blob.to_owned());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

/// Serialize `state` and write it under `key`.
pub fn save_state(storage: &dyn StateStorage, key: &str, state: &GameState) -> Result<(), StorageError> {
    let blob = serde_json::to_string(state)?;
    storage.save(key, &blob)?;
    debug!(key, bytes = blob.len(), "game state saved");
    Ok(())
}

/// Restore the state stored under `key`, or a fresh one.
///
/// Never fails: a missing save yields a new farm, and a broken save is
/// logged and replaced by a new farm. A ledger whose audit log no longer
/// reconciles is rebuilt around its balance.
pub fn load_state(storage: &dyn StateStorage, key: &str, config: &GameConfig, now: DateTime<Utc>) -> GameState {
    let defaults = GameState::new(config, now);

    let blob = match storage.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!(key, "no saved game; starting a new farm");
            return defaults;
        }
        Err(err) => {
            warn!(key, error = %err, "failed to read saved game; starting a new farm");
            return defaults;
        }
    };

    let mut state = match merge_saved(&defaults, &blob) {
        Ok(state) => state,
        Err(err) => {
            warn!(key, error = %err, "saved game is unreadable; starting a new farm");
            return defaults;
        }
    };

    if let AuditResult::Anomaly(anomaly) = state.ledger.verify() {
        warn!(key, %anomaly, balance = state.ledger.balance(), "ledger audit failed; rebuilding from balance");
        let mut ledger = Ledger::new();
        ledger.credit(LedgerReason::Restore, state.ledger.balance(), now);
        state.ledger = ledger;
    }

    info!(key, tick = state.tick, coins = state.ledger.balance(), "saved game restored");
    state
}

/// Overlay the saved top-level fields on `defaults`.
fn merge_saved(defaults: &GameState, blob: &str) -> Result<GameState, StorageError> {
    let saved: Value = serde_json::from_str(blob)?;
    let mut merged = serde_json::to_value(defaults)?;

    if let (Value::Object(base), Value::Object(overlay)) = (&mut merged, saved) {
        for (field, value) in overlay {
            if base.contains_key(&field) {
                base.insert(field, value);
            }
        }
    }

    Ok(serde_json::from_value(merged)?)
}
