use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::config::{ConfigStore, FileStore};
use crate::error::ConfigError;

/// Only the most recent entries are kept.
pub const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub file_path: PathBuf,
    pub file_name: String,
    pub action: String,
}

impl ActionLogEntry {
    pub fn now(path: &Path, action: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            file_path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            action: action.into(),
        }
    }
}

/// Append-only record of mutations.
pub trait ActionLog: Send + Sync {
    fn append(&self, entry: ActionLogEntry) -> Result<(), ConfigError>;

    fn entries(&self) -> Result<Vec<ActionLogEntry>, ConfigError>;
}

fn cap(entries: &mut Vec<ActionLogEntry>) {
    if entries.len() > MAX_LOG_ENTRIES {
        let excess = entries.len() - MAX_LOG_ENTRIES;
        entries.drain(..excess);
    }
}

/// JSON array on disk, rewritten on every append.
pub struct JsonActionLog {
    store: FileStore<Vec<ActionLogEntry>>,
    lock: Mutex<()>,
}

impl JsonActionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: FileStore::new(path),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }
}

impl ActionLog for JsonActionLog {
    fn append(&self, entry: ActionLogEntry) -> Result<(), ConfigError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.store.get()?;
        entries.push(entry);
        cap(&mut entries);
        self.store.save(&entries)
    }

    fn entries(&self) -> Result<Vec<ActionLogEntry>, ConfigError> {
        self.store.get()
    }
}

#[derive(Debug, Default)]
pub struct MemoryActionLog {
    entries: Mutex<Vec<ActionLogEntry>>,
}

impl MemoryActionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActionLog for MemoryActionLog {
    fn append(&self, entry: ActionLogEntry) -> Result<(), ConfigError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(entry);
        cap(&mut entries);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<ActionLogEntry>, ConfigError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
