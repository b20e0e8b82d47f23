use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("oracle unreachable: {0}")]
    OracleUnreachable(String),

    #[error("oracle protocol error: {0}")]
    OracleProtocolError(String),

    #[error("invalid command argument: {0}")]
    InvalidCommandArgument(String),

    #[error("home directory not found: set HOME or ROSTER_STORE_PATH")]
    HomeNotFound,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RosterError {
    /// True for either oracle failure. Callers treat both the same way:
    /// the duplicate status is unknown, so nothing may be written.
    pub fn is_oracle(&self) -> bool {
        matches!(
            self,
            RosterError::OracleUnreachable(_) | RosterError::OracleProtocolError(_)
        )
    }
}

impl From<std::io::Error> for RosterError {
    fn from(e: std::io::Error) -> Self {
        RosterError::StorageUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(e: serde_json::Error) -> Self {
        RosterError::StorageUnavailable(format!("malformed record file: {e}"))
    }
}

impl From<rusqlite::Error> for RosterError {
    fn from(e: rusqlite::Error) -> Self {
        RosterError::StorageUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
