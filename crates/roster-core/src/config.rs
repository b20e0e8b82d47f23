//! Runtime configuration, read from the environment.
//!
//! `Config::from_lookup` takes any key lookup so tests never touch the real
//! process environment.

use crate::error::{Result, RosterError};
use crate::paths;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_BOT_TOKEN: &str = "ROSTER_BOT_TOKEN";
pub const ENV_BOT_ID: &str = "ROSTER_BOT_ID";
pub const ENV_ORACLE_URL: &str = "ROSTER_ORACLE_URL";
pub const ENV_ORACLE_TIMEOUT: &str = "ROSTER_ORACLE_TIMEOUT_SECS";
pub const ENV_STORE_PATH: &str = "ROSTER_STORE_PATH";
pub const ENV_LISTEN: &str = "ROSTER_LISTEN";

pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LISTEN: &str = "0.0.0.0:3150";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Shared credential the transport must present. `None` disables auth.
    pub bot_token: Option<String>,
    /// Author id of the bot itself; its own messages are never answered.
    pub bot_id: Option<String>,
    pub oracle_url: String,
    pub oracle_timeout: Duration,
    pub store_path: PathBuf,
    pub listen: String,
}

impl Config {
    /// Build a config from `std::env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let oracle_timeout = match get(ENV_ORACLE_TIMEOUT) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    RosterError::Config(format!("{ENV_ORACLE_TIMEOUT} must be whole seconds, got '{raw}'"))
                })?;
                if secs == 0 {
                    return Err(RosterError::Config(format!(
                        "{ENV_ORACLE_TIMEOUT} must be greater than zero"
                    )));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
        };

        let store_path = match get(ENV_STORE_PATH) {
            Some(p) => PathBuf::from(p),
            None => paths::default_store_path()?,
        };

        Ok(Self {
            bot_token: get(ENV_BOT_TOKEN),
            bot_id: get(ENV_BOT_ID),
            oracle_url: get(ENV_ORACLE_URL).unwrap_or_else(|| paths::DEFAULT_ORACLE_URL.to_string()),
            oracle_timeout,
            store_path,
            listen: get(ENV_LISTEN).unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
