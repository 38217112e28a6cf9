use crate::db::{DbConnection, DbPool};
use crate::domain::price::{Price, PriceQuery};

pub mod errors;
pub mod price;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Whether a pooled connection can still answer a trivial query.
    pub fn is_healthy(&self) -> bool {
        crate::db::ping(&self.pool)
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only access to stored price records.
pub trait PriceReader {
    /// All prices of the product and brand whose window contains the instant.
    fn fetch_candidates(&self, query: &PriceQuery) -> RepositoryResult<Vec<Price>>;

    /// The winning price selected by the store itself, if any.
    ///
    /// Must agree with running [`crate::domain::resolver::resolve`] over
    /// [`PriceReader::fetch_candidates`].
    fn find_top_price(&self, query: &PriceQuery) -> RepositoryResult<Option<Price>>;
}
