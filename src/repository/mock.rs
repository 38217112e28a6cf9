use mockall::mock;

use super::PriceReader;
use crate::domain::price::{Price, PriceQuery};
use crate::repository::RepositoryResult;

mock! {
    pub PriceReader {}

    impl PriceReader for PriceReader {
        fn fetch_candidates(&self, query: &PriceQuery) -> RepositoryResult<Vec<Price>>;
        fn find_top_price(&self, query: &PriceQuery) -> RepositoryResult<Option<Price>>;
    }
}
