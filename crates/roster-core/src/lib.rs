pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod io;
pub mod oracle;
pub mod paths;
pub mod roster;
pub mod store;

pub use error::{Result, RosterError};
pub use roster::{AddOutcome, Roster};

use std::sync::Arc;

/// Open the configured store and oracle and assemble a [`Roster`].
pub fn build(config: &config::Config) -> Result<Roster> {
    let store = store::open(&config.store_path)?;
    let oracle = oracle::HttpOracle::new(config.oracle_url.clone(), config.oracle_timeout)?;
    tracing::info!(
        store = %config.store_path.display(),
        oracle = %config.oracle_url,
        "roster ready"
    );
    Ok(Roster::new(store, Arc::new(oracle)))
}
