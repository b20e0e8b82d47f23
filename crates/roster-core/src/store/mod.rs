//! Record Store: an ordered list of names behind a CRUD contract.
//!
//! Every operation takes the store's lock for its full read-modify-write,
//! so interleaved writers never lose updates. The store does no duplicate
//! checking of its own; that belongs to [`crate::roster::Roster::try_add`].
//!
//! Two backings are provided:
//!   - [`JsonFileStore`]: pretty-printed JSON array of strings
//!   - [`SqliteStore`]:   a single `records` table ordered by rowid

mod json;
mod sqlite;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::paths;
use std::path::Path;
use std::sync::Arc;

pub trait RecordStore: Send + Sync {
    /// Current contents in insertion order.
    fn list(&self) -> Result<Vec<String>>;

    /// Append `name` unconditionally. Returns the new record count.
    fn append(&self, name: &str) -> Result<usize>;

    /// Remove the first exact match of `name`. Returns the new record count,
    /// or `NotFound` with the list left untouched.
    fn remove(&self, name: &str) -> Result<usize>;
}

/// Open the store at `path`, picking the backend from the file extension
/// (`.db`/`.sqlite`/`.sqlite3` use SQLite, anything else is a JSON file).
pub fn open(path: &Path) -> Result<Arc<dyn RecordStore>> {
    if paths::is_sqlite_path(path) {
        Ok(Arc::new(SqliteStore::open(path)?))
    } else {
        Ok(Arc::new(JsonFileStore::open(path)?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use tempfile::TempDir;

    /// Both backends must satisfy the same contract.
    fn backends(dir: &TempDir) -> Vec<(&'static str, Arc<dyn RecordStore>)> {
        vec![
            ("json", open(&dir.path().join("records.json")).unwrap()),
            ("sqlite", open(&dir.path().join("records.db")).unwrap()),
        ]
    }

    #[test]
    fn append_preserves_insertion_order() {
        let dir = TempDir::new().unwrap();
        for (kind, store) in backends(&dir) {
            assert_eq!(store.append("Pizza Place").unwrap(), 1, "{kind}");
            assert_eq!(store.append("Cafe X").unwrap(), 2, "{kind}");
            assert_eq!(store.append("Pizza Place").unwrap(), 3, "{kind}");
            assert_eq!(
                store.list().unwrap(),
                vec!["Pizza Place", "Cafe X", "Pizza Place"],
                "{kind}"
            );
        }
    }

    #[test]
    fn remove_takes_first_exact_match() {
        let dir = TempDir::new().unwrap();
        for (kind, store) in backends(&dir) {
            store.append("A").unwrap();
            store.append("B").unwrap();
            store.append("A").unwrap();
            assert_eq!(store.remove("A").unwrap(), 2, "{kind}");
            assert_eq!(store.list().unwrap(), vec!["B", "A"], "{kind}");
        }
    }

    #[test]
    fn remove_missing_is_not_found_and_leaves_list() {
        let dir = TempDir::new().unwrap();
        for (kind, store) in backends(&dir) {
            store.append("Pizza Place").unwrap();
            let err = store.remove("pizza place").unwrap_err();
            assert!(matches!(err, RosterError::NotFound(_)), "{kind}: {err}");
            assert_eq!(store.list().unwrap(), vec!["Pizza Place"], "{kind}");
        }
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        let dir = TempDir::new().unwrap();
        for (kind, store) in backends(&dir) {
            let handles: Vec<_> = (0..8)
                .map(|t| {
                    let store = Arc::clone(&store);
                    std::thread::spawn(move || {
                        for i in 0..10 {
                            store.append(&format!("t{t}-{i}")).unwrap();
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
            assert_eq!(store.list().unwrap().len(), 80, "{kind}");
        }
    }
}
