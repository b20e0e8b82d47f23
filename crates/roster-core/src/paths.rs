use crate::error::{Result, RosterError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_STORE_FILE: &str = "restaurants.json";
pub const DEFAULT_ORACLE_URL: &str = "http://localhost:8000/";
pub const ORACLE_PROCESS_PATH: &str = "process-message";

pub const SQLITE_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `~/restaurants.json`, resolved through the `home` crate.
pub fn default_store_path() -> Result<PathBuf> {
    home::home_dir()
        .map(|h| h.join(DEFAULT_STORE_FILE))
        .ok_or(RosterError::HomeNotFound)
}

/// True when the store at `path` should use the SQLite backend.
pub fn is_sqlite_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SQLITE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Join the oracle base URL with the process endpoint, tolerating a
/// missing or doubled slash.
pub fn oracle_process_url(base: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), ORACLE_PROCESS_PATH)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
