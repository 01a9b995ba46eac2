use std::error::Error;
use std::fmt;

use crate::infrastructure::chain::ChainClientError;
use crate::infrastructure::persistence::error::DbError;

/// Error type for ingestion runs
#[derive(Debug)]
pub enum IngestionError {
    ChainClientError(ChainClientError),
    DbError(DbError),
    ConfigError(String),
    /// A chain-data call did not finish within the configured bound
    Timeout(String),
}

impl fmt::Display for IngestionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionError::ChainClientError(e) => write!(f, "Chain client error: {}", e),
            IngestionError::DbError(e) => write!(f, "Database error: {}", e),
            IngestionError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            IngestionError::Timeout(msg) => write!(f, "Timed out: {}", msg),
        }
    }
}

impl Error for IngestionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IngestionError::ChainClientError(e) => Some(e),
            IngestionError::DbError(e) => Some(e),
            IngestionError::ConfigError(_) | IngestionError::Timeout(_) => None,
        }
    }
}

impl From<ChainClientError> for IngestionError {
    fn from(error: ChainClientError) -> Self {
        IngestionError::ChainClientError(error)
    }
}

impl From<DbError> for IngestionError {
    fn from(error: DbError) -> Self {
        IngestionError::DbError(error)
    }
}
