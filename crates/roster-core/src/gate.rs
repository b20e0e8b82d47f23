//! Confirmation Gate: per-scope single-slot state machine.
//!
//! ```text
//!            install                      !no  (append candidate)
//!   Idle ─────────────▶ AwaitingDecision ─────────────────────────▶ Idle
//!                        │      ▲         !yes (discard)
//!                        │      │       ─────────────────────────▶ Idle
//!                        └──────┘
//!                      other input: re-prompt, entry kept
//! ```
//!
//! Entries live only in memory and never expire.

use crate::command;
use crate::error::Result;
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingConfirmation {
    pub scope: String,
    pub candidate: String,
    pub matched: String,
    pub installed_at: DateTime<Utc>,
}

impl PendingConfirmation {
    pub fn new(
        scope: impl Into<String>,
        candidate: impl Into<String>,
        matched: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            candidate: candidate.into(),
            matched: matched.into(),
            installed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The scope has nothing pending; treat the input as an ordinary command.
    NotPending,
    /// `!no`: the candidate was appended without a second oracle check.
    Committed { name: String, count: usize },
    /// `!yes`: the candidate was dropped; nothing written.
    Discarded { name: String, matched: String },
    /// Input was not a confirmation; the entry is still pending.
    Reprompt(PendingConfirmation),
}

// ---------------------------------------------------------------------------
// ConfirmationGate
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ConfirmationGate {
    pending: Mutex<HashMap<String, PendingConfirmation>>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, PendingConfirmation>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install `entry` for its scope, replacing whatever was there.
    /// Returns the replaced entry.
    pub fn install(&self, entry: PendingConfirmation) -> Option<PendingConfirmation> {
        let scope = entry.scope.clone();
        let replaced = self.map().insert(scope.clone(), entry);
        if let Some(ref old) = replaced {
            tracing::info!(%scope, dropped = %old.candidate, "pending confirmation replaced");
        }
        replaced
    }

    pub fn pending(&self, scope: &str) -> Option<PendingConfirmation> {
        self.map().get(scope).cloned()
    }

    /// All pending entries, oldest first.
    pub fn snapshot(&self) -> Vec<PendingConfirmation> {
        let mut all: Vec<_> = self.map().values().cloned().collect();
        all.sort_by_key(|p| p.installed_at);
        all
    }

    /// Resolve the scope's pending entry against `input`.
    ///
    /// The entry is taken out of the map before any store write, so two
    /// racing confirmations resolve it once. If the append fails the entry
    /// is put back unless a newer one has been installed meanwhile.
    pub fn resolve(
        &self,
        scope: &str,
        input: &str,
        store: &dyn RecordStore,
    ) -> Result<Resolution> {
        let decision = command::parse(input).confirmation();

        let entry = {
            let mut map = self.map();
            let Some(current) = map.get(scope) else {
                return Ok(Resolution::NotPending);
            };
            if decision.is_none() {
                return Ok(Resolution::Reprompt(current.clone()));
            }
            match map.remove(scope) {
                Some(e) => e,
                None => return Ok(Resolution::NotPending),
            }
        };

        match decision {
            Some(true) => {
                tracing::info!(%scope, name = %entry.candidate, matched = %entry.matched, "duplicate confirmed, discarded");
                Ok(Resolution::Discarded {
                    name: entry.candidate,
                    matched: entry.matched,
                })
            }
            _ => match store.append(&entry.candidate) {
                Ok(count) => {
                    tracing::info!(%scope, name = %entry.candidate, count, "duplicate rejected, added");
                    Ok(Resolution::Committed {
                        name: entry.candidate,
                        count,
                    })
                }
                Err(e) => {
                    self.map().entry(scope.to_string()).or_insert(entry);
                    Err(e)
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::store::{RecordStore, SqliteStore};
    use std::sync::Arc;

    fn store_with(names: &[&str]) -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        for n in names {
            store.append(n).unwrap();
        }
        store
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    impl RecordStore for BrokenStore {
        fn list(&self) -> Result<Vec<String>> {
            Err(RosterError::StorageUnavailable("disk gone".into()))
        }
        fn append(&self, _name: &str) -> Result<usize> {
            Err(RosterError::StorageUnavailable("disk gone".into()))
        }
        fn remove(&self, _name: &str) -> Result<usize> {
            Err(RosterError::StorageUnavailable("disk gone".into()))
        }
    }

    #[test]
    fn idle_scope_is_not_pending() {
        let gate = ConfirmationGate::new();
        let store = store_with(&[]);
        assert_eq!(
            gate.resolve("s1", "!no", &store).unwrap(),
            Resolution::NotPending
        );
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn reject_commits_candidate_once() {
        let gate = ConfirmationGate::new();
        let store = store_with(&["Pizza Place"]);
        gate.install(PendingConfirmation::new("s1", "Pizza Plaza", "Pizza Place"));

        let r = gate.resolve("s1", "!no", &store).unwrap();
        assert_eq!(
            r,
            Resolution::Committed {
                name: "Pizza Plaza".into(),
                count: 2
            }
        );
        assert_eq!(store.list().unwrap(), vec!["Pizza Place", "Pizza Plaza"]);
        assert_eq!(
            gate.resolve("s1", "!no", &store).unwrap(),
            Resolution::NotPending
        );
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn accept_discards_without_writing() {
        let gate = ConfirmationGate::new();
        let store = store_with(&["Pizza Place"]);
        gate.install(PendingConfirmation::new("s1", "Pizza Plaza", "Pizza Place"));

        let r = gate.resolve("s1", "!YES", &store).unwrap();
        assert_eq!(
            r,
            Resolution::Discarded {
                name: "Pizza Plaza".into(),
                matched: "Pizza Place".into()
            }
        );
        assert_eq!(store.list().unwrap(), vec!["Pizza Place"]);
        assert!(gate.pending("s1").is_none());
    }

    #[test]
    fn other_input_reprompts_and_keeps_entry() {
        let gate = ConfirmationGate::new();
        let store = store_with(&[]);
        gate.install(PendingConfirmation::new("s1", "Pizza Plaza", "Pizza Place"));

        for input in ["!list", "maybe?", r#"!add "Other""#] {
            match gate.resolve("s1", input, &store).unwrap() {
                Resolution::Reprompt(p) => assert_eq!(p.candidate, "Pizza Plaza"),
                other => panic!("expected reprompt for {input}, got {other:?}"),
            }
        }
        assert!(gate.pending("s1").is_some());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn install_overwrites_last_writer_wins() {
        let gate = ConfirmationGate::new();
        assert!(gate
            .install(PendingConfirmation::new("s1", "A", "AA"))
            .is_none());
        let replaced = gate.install(PendingConfirmation::new("s1", "B", "BB"));
        assert_eq!(replaced.unwrap().candidate, "A");
        assert_eq!(gate.pending("s1").unwrap().candidate, "B");
        assert_eq!(gate.snapshot().len(), 1);
    }

    #[test]
    fn scopes_do_not_interact() {
        let gate = ConfirmationGate::new();
        let store = store_with(&[]);
        gate.install(PendingConfirmation::new("s1", "A", "AA"));
        gate.install(PendingConfirmation::new("s2", "B", "BB"));

        gate.resolve("s1", "!no", &store).unwrap();
        assert!(gate.pending("s1").is_none());
        assert_eq!(gate.pending("s2").unwrap().candidate, "B");
        assert_eq!(store.list().unwrap(), vec!["A"]);
    }

    #[test]
    fn failed_commit_restores_entry() {
        let gate = ConfirmationGate::new();
        gate.install(PendingConfirmation::new("s1", "A", "AA"));
        let err = gate.resolve("s1", "!no", &BrokenStore).unwrap_err();
        assert!(matches!(err, RosterError::StorageUnavailable(_)));
        assert_eq!(gate.pending("s1").unwrap().candidate, "A");
    }

    #[test]
    fn racing_confirmations_commit_exactly_once() {
        let gate = Arc::new(ConfirmationGate::new());
        let store = Arc::new(store_with(&[]));
        gate.install(PendingConfirmation::new("s1", "Pizza Plaza", "Pizza Place"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let store = Arc::clone(&store);
                std::thread::spawn(move || gate.resolve("s1", "!no", &*store).unwrap())
            })
            .collect();
        let committed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| matches!(r, Resolution::Committed { .. }))
            .count();

        assert_eq!(committed, 1);
        assert_eq!(store.list().unwrap(), vec!["Pizza Plaza"]);
    }
}
