use std::str::FromStr;

use crate::domain::price::{Price, PriceQuery};
use crate::domain::resolver::resolve;
use crate::repository::PriceReader;
use crate::services::{ServiceError, ServiceResult};

/// Use case returning the price that applies to a query.
pub trait PriceLookup {
    fn find_applicable_price(&self, query: &PriceQuery) -> ServiceResult<Price>;
}

/// Where the winning price is picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Load all candidates and resolve them in memory.
    #[default]
    InMemory,
    /// Let the store order and limit the candidates.
    Store,
}

impl FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in-memory" | "in_memory" | "memory" => Ok(Self::InMemory),
            "store" | "database" | "db" => Ok(Self::Store),
            other => Err(format!("unknown selection strategy `{other}`")),
        }
    }
}

/// Price lookup backed by a [`PriceReader`].
#[derive(Clone)]
pub struct PriceService<R> {
    repo: R,
    strategy: SelectionStrategy,
}

impl<R> PriceService<R>
where
    R: PriceReader,
{
    pub fn new(repo: R, strategy: SelectionStrategy) -> Self {
        Self { repo, strategy }
    }
}

impl<R> PriceLookup for PriceService<R>
where
    R: PriceReader,
{
    fn find_applicable_price(&self, query: &PriceQuery) -> ServiceResult<Price> {
        let winner = match self.strategy {
            SelectionStrategy::InMemory => {
                let candidates = self.repo.fetch_candidates(query)?;
                resolve(candidates, query.instant)
            }
            SelectionStrategy::Store => self.repo.find_top_price(query)?,
        };

        match winner {
            Some(price) => {
                log::debug!(
                    "Resolved price list {} for product {} brand {} at {}",
                    price.price_list_id(),
                    query.product_id,
                    query.brand_id,
                    query.instant
                );
                Ok(price)
            }
            None => Err(ServiceError::NotFound),
        }
    }
}
