use std::error::Error;
use std::fmt;

/// Error type for database operations
#[derive(Debug)]
pub enum DbError {
    /// Error from SeaORM
    SeaOrmError(sea_orm::DbErr),
    /// Connection error
    ConnectionError(String),
    /// A bulk insert failed part way through a batch sequence
    BatchError {
        /// Zero-based index of the failing batch
        batch: usize,
        /// Batches attempted in total
        total_batches: usize,
        source: sea_orm::DbErr,
    },
    /// Stored value does not fit the domain type
    InvalidData(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::SeaOrmError(e) => write!(f, "Database error: {}", e),
            DbError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            DbError::BatchError {
                batch,
                total_batches,
                source,
            } => write!(
                f,
                "Batch {}/{} failed: {}",
                batch + 1,
                total_batches,
                source
            ),
            DbError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DbError::SeaOrmError(e) => Some(e),
            DbError::BatchError { source, .. } => Some(source),
            DbError::ConnectionError(_) | DbError::InvalidData(_) => None,
        }
    }
}

impl From<sea_orm::DbErr> for DbError {
    fn from(err: sea_orm::DbErr) -> Self {
        DbError::SeaOrmError(err)
    }
}
