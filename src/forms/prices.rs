use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::price::PriceQuery;

pub const APPLICATION_DATE_PARAM: &str = "applicationDate";
pub const PRODUCT_ID_PARAM: &str = "productId";
pub const BRAND_ID_PARAM: &str = "brandId";

/// Result type returned by the price query helpers.
pub type PriceQueryResult<T> = Result<T, PriceQueryError>;

/// Errors that can occur while binding the price query parameters.
#[derive(Debug, Error)]
pub enum PriceQueryError {
    /// A required parameter was absent or blank.
    #[error("required parameter '{0}' is missing")]
    MissingParameter(&'static str),
    /// A parameter could not be converted to the expected type.
    #[error("parameter '{parameter}' expects a value of type {expected}, got '{value}'")]
    InvalidType {
        parameter: &'static str,
        expected: &'static str,
        value: String,
    },
    /// The application date is not an ISO-8601 local date-time.
    #[error("date must use the ISO-8601 format (e.g. 2020-06-14T10:00:00), got '{0}'")]
    InvalidDate(String),
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl PriceQueryError {
    /// Name of the offending parameter, when the error concerns exactly one.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameter(parameter) => Some(*parameter),
            Self::InvalidType { parameter, .. } => Some(*parameter),
            Self::InvalidDate(_) => Some(APPLICATION_DATE_PARAM),
            Self::Validation(_) => None,
        }
    }
}

/// Raw query string of `GET /api/v1/prices`.
///
/// Fields stay textual so that every binding failure can be reported against
/// the parameter that caused it.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQueryParams {
    pub application_date: Option<String>,
    pub product_id: Option<String>,
    pub brand_id: Option<String>,
}

/// Typed parameters checked with `validator` before building the query.
#[derive(Debug, Validate)]
struct CheckedPriceQuery {
    instant: NaiveDateTime,
    #[validate(range(min = 1))]
    product_id: i64,
    #[validate(range(min = 1))]
    brand_id: i64,
}

impl PriceQueryParams {
    /// Parses and validates the parameters into a domain [`PriceQuery`].
    pub fn into_price_query(self) -> PriceQueryResult<PriceQuery> {
        let application_date = required(self.application_date, APPLICATION_DATE_PARAM)?;
        let product_id = required(self.product_id, PRODUCT_ID_PARAM)?;
        let brand_id = required(self.brand_id, BRAND_ID_PARAM)?;

        let checked = CheckedPriceQuery {
            instant: parse_instant(&application_date)?,
            product_id: parse_id(&product_id, PRODUCT_ID_PARAM)?,
            brand_id: parse_id(&brand_id, BRAND_ID_PARAM)?,
        };
        checked.validate()?;

        Ok(PriceQuery::new(
            checked.instant,
            checked.product_id,
            checked.brand_id,
        ))
    }
}

fn required(value: Option<String>, parameter: &'static str) -> PriceQueryResult<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(PriceQueryError::MissingParameter(parameter))
}

fn parse_id(value: &str, parameter: &'static str) -> PriceQueryResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| PriceQueryError::InvalidType {
            parameter,
            expected: "integer",
            value: value.to_string(),
        })
}

/// Accepts `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds, or a space
/// instead of the `T`.
fn parse_instant(value: &str) -> PriceQueryResult<NaiveDateTime> {
    value
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| PriceQueryError::InvalidDate(value.to_string()))
}
