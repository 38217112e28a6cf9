use thiserror::Error;

use crate::repository::RepositoryError;

pub mod prices;
pub mod resilience;

/// Result type returned by service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the price lookup use case.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No price applies to the requested product, brand and instant.
    #[error("price not found")]
    NotFound,
    /// The price store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Too many lookups are already in flight.
    #[error("too many concurrent price lookups")]
    BulkheadFull,
    /// The store has been failing and calls are short-circuited.
    #[error("price store temporarily unavailable")]
    CircuitOpen,
}
