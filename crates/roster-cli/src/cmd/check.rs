use anyhow::Result;
use roster_core::config::Config;
use roster_core::oracle::{HttpOracle, SimilarityOracle};
use roster_core::store::RecordStore;

/// Query the oracle directly against the current list. Nothing is written.
pub fn run(config: &Config, name: &str, json: bool) -> Result<()> {
    let store = roster_core::store::open(&config.store_path)?;
    let oracle = HttpOracle::new(config.oracle_url.clone(), config.oracle_timeout)?;
    let existing = store.list()?;
    let verdict = oracle.check_duplicate(name, &existing)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else if verdict.is_duplicate {
        println!(
            "\"{name}\" looks like \"{}\" (score {:.2})",
            verdict.matched_name, verdict.similarity_score
        );
    } else {
        println!("\"{name}\" is unique among {} entries", existing.len());
    }
    Ok(())
}
