use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::price::{Price as DomainPrice, PriceValidationError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Price {
    pub id: i32,
    pub brand_id: i64,
    pub product_id: i64,
    pub price_list: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub priority: i32,
    pub price: String,
    pub currency: String,
}

/// Reasons a stored row cannot be turned into a domain price.
#[derive(Debug, Error)]
pub enum PriceRowError {
    #[error("price {id} has a malformed amount `{value}`: {source}")]
    Amount {
        id: i32,
        value: String,
        source: rust_decimal::Error,
    },
    #[error("price {id} is invalid: {source}")]
    Invalid {
        id: i32,
        source: PriceValidationError,
    },
}

impl TryFrom<Price> for DomainPrice {
    type Error = PriceRowError;

    fn try_from(value: Price) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(value.price.trim()).map_err(|source| {
            PriceRowError::Amount {
                id: value.id,
                value: value.price.clone(),
                source,
            }
        })?;

        DomainPrice::builder()
            .id(value.id)
            .brand_id(value.brand_id)
            .product_id(value.product_id)
            .price_list_id(value.price_list)
            .valid_between(value.start_date, value.end_date)
            .priority(value.priority)
            .amount(amount)
            .currency(value.currency)
            .build()
            .map_err(|source| PriceRowError::Invalid {
                id: value.id,
                source,
            })
    }
}
