use super::RecordStore;
use crate::error::{Result, RosterError};
use crate::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Records kept as a pretty-printed JSON array in a single file.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, creating the file as `[]` if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if io::write_if_missing(&path, b"[]")? {
            tracing::info!(path = %path.display(), "created record file");
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    // The guarded value is `()`, so a poisoned lock carries no broken state.
    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, records: &[String]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        io::atomic_write(&self.path, content.as_bytes())
    }
}

impl RecordStore for JsonFileStore {
    fn list(&self) -> Result<Vec<String>> {
        let _guard = self.guard();
        self.load()
    }

    fn append(&self, name: &str) -> Result<usize> {
        let _guard = self.guard();
        let mut records = self.load()?;
        records.push(name.to_string());
        self.save(&records)?;
        Ok(records.len())
    }

    fn remove(&self, name: &str) -> Result<usize> {
        let _guard = self.guard();
        let mut records = self.load()?;
        let Some(idx) = records.iter().position(|r| r == name) else {
            return Err(RosterError::NotFound(name.to_string()));
        };
        records.remove(idx);
        self.save(&records)?;
        Ok(records.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
