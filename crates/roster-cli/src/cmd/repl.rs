use anyhow::Result;
use roster_core::config::Config;
use std::io::{BufRead, Write};

/// A local chat transport: every stdin line is one message in `scope`.
/// Pending confirmations live for the length of the session.
pub fn run(config: &Config, scope: &str) -> Result<()> {
    let roster = roster_core::build(config)?;
    let stdin = std::io::stdin();
    let mut out = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let text = line.trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            continue;
        }
        if let Some(reply) = roster.handle(scope, text) {
            writeln!(out, "{reply}")?;
            out.flush()?;
        }
    }
    Ok(())
}
