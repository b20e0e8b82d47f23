//! Chat command tokenizer. Turns raw message text into a [`Command`]
//! without knowing anything about the transport that delivered it.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    List,
    /// `!add "<name>"`. The name may be empty; dispatch rejects that.
    Add(String),
    /// `!remove "<name>"`.
    Remove(String),
    /// `!yes` is `Confirm(true)`: it is a duplicate, do not add.
    /// `!no` is `Confirm(false)`: not a duplicate, add anyway.
    Confirm(bool),
    /// `!ml`: oracle health probe.
    Health,
    Unknown,
}

static QUOTED_RE: OnceLock<Regex> = OnceLock::new();

// A lone `"` is both the opening and the closing quote of an empty name.
fn quoted_re() -> &'static Regex {
    QUOTED_RE.get_or_init(|| Regex::new(r#"(?s)^!(add|remove) "(?:(.*)")?$"#).unwrap())
}

pub fn parse(text: &str) -> Command {
    match text {
        "!ping" => return Command::Ping,
        "!list" => return Command::List,
        "!ml" => return Command::Health,
        _ => {}
    }

    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("!yes") {
        return Command::Confirm(true);
    }
    if trimmed.eq_ignore_ascii_case("!no") {
        return Command::Confirm(false);
    }

    let Some(caps) = quoted_re().captures(text) else {
        return Command::Unknown;
    };
    let name = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    match &caps[1] {
        "add" => Command::Add(name),
        _ => Command::Remove(name),
    }
}

impl Command {
    /// The decision carried by a confirmation, if this is one.
    pub fn confirmation(&self) -> Option<bool> {
        match self {
            Command::Confirm(is_duplicate) => Some(*is_duplicate),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
