//! Duplicate-Gated Insertion.
//!
//! [`Roster`] owns the record store, the oracle client and the confirmation
//! gate. Transports hold it behind an `Arc` and call [`Roster::handle`]
//! (see `dispatch.rs`) or the typed operations below.

use crate::error::{Result, RosterError};
use crate::gate::{ConfirmationGate, PendingConfirmation, Resolution};
use crate::oracle::SimilarityOracle;
use crate::store::RecordStore;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// No duplicate found; the candidate was committed.
    Added(usize),
    /// The oracle flagged a likely duplicate of the carried name. Nothing
    /// was written and a confirmation is pending for the scope.
    PendingConfirmation(String),
}

pub struct Roster {
    store: Arc<dyn RecordStore>,
    oracle: Arc<dyn SimilarityOracle>,
    gate: ConfirmationGate,
}

impl Roster {
    pub fn new(store: Arc<dyn RecordStore>, oracle: Arc<dyn SimilarityOracle>) -> Self {
        Self {
            store,
            oracle,
            gate: ConfirmationGate::new(),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn oracle(&self) -> &dyn SimilarityOracle {
        self.oracle.as_ref()
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// Add `candidate` unless the oracle thinks it duplicates an existing
    /// record, in which case a confirmation is parked for `scope`.
    ///
    /// The store is read and written in two separate critical sections and
    /// the oracle is called between them with no lock held. Oracle failure
    /// aborts the add with nothing written and nothing installed.
    pub fn try_add(&self, scope: &str, candidate: &str) -> Result<AddOutcome> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(RosterError::InvalidCommandArgument(
                "Please provide a name, e.g. !add \"Name\".".to_string(),
            ));
        }

        let existing = self.store.list()?;
        let verdict = self.oracle.check_duplicate(candidate, &existing)?;

        if !verdict.is_duplicate {
            let count = self.store.append(candidate)?;
            tracing::info!(%scope, name = %candidate, count, "record added");
            return Ok(AddOutcome::Added(count));
        }

        tracing::info!(
            %scope,
            name = %candidate,
            matched = %verdict.matched_name,
            score = verdict.similarity_score,
            "possible duplicate, awaiting confirmation"
        );
        self.gate.install(PendingConfirmation::new(
            scope,
            candidate,
            verdict.matched_name.clone(),
        ));
        Ok(AddOutcome::PendingConfirmation(verdict.matched_name))
    }

    /// Resolve a pending confirmation for `scope` against `input`.
    pub fn resolve(&self, scope: &str, input: &str) -> Result<Resolution> {
        self.gate.resolve(scope, input, self.store.as_ref())
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    pub fn remove(&self, name: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::InvalidCommandArgument(
                "Please provide a name to remove, e.g. !remove \"Name\".".to_string(),
            ));
        }
        let count = self.store.remove(name)?;
        tracing::info!(name = %name, count, "record removed");
        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
