//! Command dispatch: the boundary where every outcome and every collaborator
//! error becomes reply text. Nothing here panics or propagates an error.

use crate::command::{self, Command};
use crate::error::RosterError;
use crate::gate::Resolution;
use crate::roster::{AddOutcome, Roster};

pub const NOTHING_PENDING: &str = "There is nothing waiting for confirmation.";
pub const STORAGE_FAILED: &str = "Something went wrong reading the list.";
pub const ORACLE_FAILED: &str = "Could not complete the duplicate check, nothing was added.";

impl Roster {
    /// Handle one inbound message for `scope`. Returns `None` when the
    /// message is not addressed to the bot.
    ///
    /// A pending confirmation in the scope sees the message first; only when
    /// nothing is pending is it treated as an ordinary command.
    pub fn handle(&self, scope: &str, text: &str) -> Option<String> {
        match self.resolve(scope, text) {
            Ok(Resolution::NotPending) => {}
            Ok(resolution) => return Some(resolution_reply(&resolution)),
            Err(e) => return Some(error_reply(scope, &e)),
        }

        let reply = match command::parse(text) {
            Command::Ping => Ok("Pong!".to_string()),
            Command::List => self.list().map(|names| list_reply(&names)),
            Command::Add(name) => self
                .try_add(scope, &name)
                .map(|outcome| add_reply(&name, &outcome)),
            Command::Remove(name) => self
                .remove(&name)
                .map(|count| format!("Removed \"{}\". Total count: {count}.", name.trim())),
            Command::Confirm(_) => Ok(NOTHING_PENDING.to_string()),
            Command::Health => Ok(match self.oracle().health() {
                Ok(()) => "Oracle is up.".to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "oracle health check failed");
                    format!("Oracle health check failed: {e}")
                }
            }),
            Command::Unknown => return None,
        };

        Some(reply.unwrap_or_else(|e| error_reply(scope, &e)))
    }
}

// ---------------------------------------------------------------------------
// Reply text
// ---------------------------------------------------------------------------

pub fn list_reply(names: &[String]) -> String {
    if names.is_empty() {
        return "No entries found.".to_string();
    }
    format!("Entries:\n- {}", names.join("\n- "))
}

pub fn duplicate_prompt(candidate: &str, matched: &str) -> String {
    format!(
        "\"{candidate}\" looks like a duplicate of \"{matched}\". \
         Reply !yes if it is the same (nothing will be added) or !no to add it anyway."
    )
}

fn add_reply(name: &str, outcome: &AddOutcome) -> String {
    let name = name.trim();
    match outcome {
        AddOutcome::Added(count) => format!("Added \"{name}\". Total count: {count}."),
        AddOutcome::PendingConfirmation(matched) => duplicate_prompt(name, matched),
    }
}

fn resolution_reply(resolution: &Resolution) -> String {
    match resolution {
        Resolution::NotPending => NOTHING_PENDING.to_string(),
        Resolution::Committed { name, count } => {
            format!("Added \"{name}\". Total count: {count}.")
        }
        Resolution::Discarded { name, .. } => format!("Okay, \"{name}\" was not added."),
        Resolution::Reprompt(p) => format!(
            "Still waiting on \"{}\" (possible duplicate of \"{}\"). Please reply !yes or !no.",
            p.candidate, p.matched
        ),
    }
}

fn error_reply(scope: &str, e: &RosterError) -> String {
    match e {
        RosterError::NotFound(name) => format!("\"{name}\" was not found."),
        RosterError::InvalidCommandArgument(hint) => hint.clone(),
        e if e.is_oracle() => {
            tracing::warn!(%scope, error = %e, "duplicate check failed");
            ORACLE_FAILED.to_string()
        }
        e => {
            tracing::error!(%scope, error = %e, "command failed");
            STORAGE_FAILED.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::DuplicateVerdict;
    use crate::roster::tests::{roster_with, Scripted, ScriptedOracle};
    use crate::store::JsonFileStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn reply(roster: &Roster, text: &str) -> String {
        roster.handle("chan-1", text).expect("expected a reply")
    }

    #[test]
    fn ping_and_unknown() {
        let dir = TempDir::new().unwrap();
        let (roster, _) = roster_with(&dir, &[], vec![]);
        assert_eq!(reply(&roster, "!ping"), "Pong!");
        assert_eq!(roster.handle("chan-1", "just chatting"), None);
    }

    #[test]
    fn list_empty_and_populated() {
        let dir = TempDir::new().unwrap();
        let (roster, _) = roster_with(&dir, &[], vec![]);
        assert_eq!(reply(&roster, "!list"), "No entries found.");
        roster.store().append("Pizza Place").unwrap();
        roster.store().append("Cafe X").unwrap();
        assert_eq!(
            reply(&roster, "!list"),
            "Entries:\n- Pizza Place\n- Cafe X"
        );
    }

    #[test]
    fn add_flow_with_confirmation() {
        let dir = TempDir::new().unwrap();
        let (roster, _) = roster_with(
            &dir,
            &["Pizza Place"],
            vec![Scripted::Verdict(DuplicateVerdict::duplicate_of(
                "Pizza Place",
                0.93,
            ))],
        );

        let prompt = reply(&roster, r#"!add "Pizza Plaza""#);
        assert!(prompt.contains("\"Pizza Plaza\" looks like a duplicate of \"Pizza Place\""));

        let nag = reply(&roster, "!list");
        assert!(nag.starts_with("Still waiting on \"Pizza Plaza\""), "{nag}");

        assert_eq!(
            reply(&roster, "!No"),
            "Added \"Pizza Plaza\". Total count: 2."
        );
        assert_eq!(reply(&roster, "!no"), NOTHING_PENDING);
    }

    #[test]
    fn confirmation_in_other_scope_is_not_pending() {
        let dir = TempDir::new().unwrap();
        let (roster, _) = roster_with(
            &dir,
            &["Pizza Place"],
            vec![Scripted::Verdict(DuplicateVerdict::duplicate_of(
                "Pizza Place",
                0.93,
            ))],
        );
        roster.handle("chan-1", r#"!add "Pizza Plaza""#);
        assert_eq!(
            roster.handle("chan-2", "!yes").as_deref(),
            Some(NOTHING_PENDING)
        );
        assert_eq!(reply(&roster, "!yes"), "Okay, \"Pizza Plaza\" was not added.");
        assert_eq!(roster.list().unwrap(), vec!["Pizza Place"]);
    }

    #[test]
    fn unique_add_and_remove() {
        let dir = TempDir::new().unwrap();
        let (roster, _) = roster_with(&dir, &[], vec![]);
        assert_eq!(
            reply(&roster, r#"!add "Cafe X""#),
            "Added \"Cafe X\". Total count: 1."
        );
        assert_eq!(
            reply(&roster, r#"!remove "Cafe X""#),
            "Removed \"Cafe X\". Total count: 0."
        );
        assert_eq!(
            reply(&roster, r#"!remove "Cafe X""#),
            "\"Cafe X\" was not found."
        );
    }

    #[test]
    fn blank_names_prompt_for_value() {
        let dir = TempDir::new().unwrap();
        let (roster, oracle) = roster_with(&dir, &[], vec![]);
        assert!(reply(&roster, r#"!add """#).starts_with("Please provide a name"));
        assert!(reply(&roster, r#"!remove " ""#).starts_with("Please provide a name to remove"));
        assert!(reply(&roster, r#"!add ""#).starts_with("Please provide a name"));
        assert!(reply(&roster, r#"!remove ""#).starts_with("Please provide a name to remove"));
        assert_eq!(
            oracle.calls.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }

    #[test]
    fn oracle_failure_reply() {
        let dir = TempDir::new().unwrap();
        let (roster, _) = roster_with(&dir, &[], vec![Scripted::Unreachable]);
        assert_eq!(reply(&roster, r#"!add "Cafe X""#), ORACLE_FAILED);
        assert!(roster.list().unwrap().is_empty());
    }

    #[test]
    fn storage_failure_reply() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("restaurants.json");
        let store = JsonFileStore::open(&path).unwrap();
        let roster = Roster::new(Arc::new(store), Arc::new(ScriptedOracle::new(vec![])));
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(reply(&roster, "!list"), STORAGE_FAILED);
        assert_eq!(reply(&roster, r#"!add "Cafe X""#), STORAGE_FAILED);
    }

    #[test]
    fn health_replies() {
        let dir = TempDir::new().unwrap();
        let (roster, _) = roster_with(&dir, &[], vec![]);
        assert_eq!(reply(&roster, "!ml"), "Oracle is up.");

        let store = JsonFileStore::open(dir.path().join("other.json")).unwrap();
        let roster = Roster::new(Arc::new(store), Arc::new(ScriptedOracle::unhealthy()));
        assert!(reply(&roster, "!ml").starts_with("Oracle health check failed:"));
    }
}
