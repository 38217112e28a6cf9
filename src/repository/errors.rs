use thiserror::Error;

use crate::models::price::PriceRowError;

/// Result type returned by repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures raised by the price store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// The query itself failed.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    /// A stored row could not be mapped to a valid price.
    #[error("invalid stored record: {0}")]
    InvalidRecord(#[from] PriceRowError),
}
