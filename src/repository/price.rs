use diesel::prelude::*;

use crate::{
    domain::price::{Price as DomainPrice, PriceQuery},
    models::price::Price as DbPrice,
    repository::{DieselRepository, PriceReader, RepositoryError, RepositoryResult},
};

impl PriceReader for DieselRepository {
    fn fetch_candidates(&self, query: &PriceQuery) -> RepositoryResult<Vec<DomainPrice>> {
        use crate::schema::prices;

        let mut conn = self.conn()?;
        let rows = prices::table
            .filter(prices::product_id.eq(query.product_id))
            .filter(prices::brand_id.eq(query.brand_id))
            .filter(prices::start_date.le(query.instant))
            .filter(prices::end_date.ge(query.instant))
            .select(DbPrice::as_select())
            .load::<DbPrice>(&mut conn)?;

        log::debug!(
            "Loaded {} candidate prices for product {} brand {} at {}",
            rows.len(),
            query.product_id,
            query.brand_id,
            query.instant
        );

        rows.into_iter()
            .map(|row| DomainPrice::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn find_top_price(&self, query: &PriceQuery) -> RepositoryResult<Option<DomainPrice>> {
        use crate::schema::prices;

        let mut conn = self.conn()?;
        let row = prices::table
            .filter(prices::product_id.eq(query.product_id))
            .filter(prices::brand_id.eq(query.brand_id))
            .filter(prices::start_date.le(query.instant))
            .filter(prices::end_date.ge(query.instant))
            .order((
                prices::priority.desc(),
                prices::price_list.asc(),
                prices::start_date.desc(),
                prices::id.asc(),
            ))
            .select(DbPrice::as_select())
            .first::<DbPrice>(&mut conn)
            .optional()?;

        row.map(DomainPrice::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }
}
