use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use thiserror::Error;

/// ISO 4217 currency codes are three ASCII alphabetic characters.
const CURRENCY_CODE_LEN: usize = 3;

/// Errors raised when a price record violates one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceValidationError {
    /// A required attribute was not supplied.
    #[error("`{0}` is required")]
    MissingField(&'static str),
    /// The validity window starts after it ends.
    #[error("start date {start} is after end date {end}")]
    InvertedInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Prices must be strictly positive.
    #[error("price amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    /// Priorities start at zero.
    #[error("priority cannot be negative, got {0}")]
    NegativePriority(i32),
    /// The currency is not a three letter ISO 4217 code.
    #[error("invalid currency code `{0}`")]
    InvalidCurrency(String),
}

/// Three letter ISO 4217 currency code, always upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Currency {
    type Err = PriceValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim();
        if code.len() != CURRENCY_CODE_LEN || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(PriceValidationError::InvalidCurrency(value.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A priced offer for a product under a brand, valid over the closed
/// interval `[start_date, end_date]`.
///
/// Instances can only be obtained through [`PriceBuilder::build`], so every
/// `Price` in circulation satisfies the record invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    id: Option<i32>,
    brand_id: i64,
    product_id: i64,
    price_list_id: i32,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    amount: Decimal,
    currency: Currency,
    priority: u32,
}

impl Price {
    /// Start building a record.
    pub fn builder() -> PriceBuilder {
        PriceBuilder::default()
    }

    /// Storage identifier, if the record has been persisted.
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    /// Identifier of the owning brand or chain.
    pub fn brand_id(&self) -> i64 {
        self.brand_id
    }

    /// Identifier of the priced product.
    pub fn product_id(&self) -> i64 {
        self.product_id
    }

    /// Tariff this entry belongs to.
    pub fn price_list_id(&self) -> i32 {
        self.price_list_id
    }

    /// First instant (inclusive) at which the price applies.
    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    /// Last instant (inclusive) at which the price applies.
    pub fn end_date(&self) -> NaiveDateTime {
        self.end_date
    }

    /// Monetary amount with its original scale.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Rank used to arbitrate overlapping windows; higher wins.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Whether `instant` falls inside the validity window, both ends included.
    pub fn is_applicable_at(&self, instant: NaiveDateTime) -> bool {
        self.start_date <= instant && instant <= self.end_date
    }
}

/// Collects the attributes of a [`Price`] and validates them on `build`.
#[derive(Debug, Clone, Default)]
pub struct PriceBuilder {
    id: Option<i32>,
    brand_id: Option<i64>,
    product_id: Option<i64>,
    price_list_id: Option<i32>,
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
    amount: Option<Decimal>,
    currency: Option<String>,
    priority: Option<i32>,
}

impl PriceBuilder {
    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn brand_id(mut self, brand_id: i64) -> Self {
        self.brand_id = Some(brand_id);
        self
    }

    pub fn product_id(mut self, product_id: i64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn price_list_id(mut self, price_list_id: i32) -> Self {
        self.price_list_id = Some(price_list_id);
        self
    }

    /// Set both ends of the validity window.
    pub fn valid_between(mut self, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the priority. Left unset, it defaults to `0`.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Validate the collected attributes and produce an immutable [`Price`].
    pub fn build(self) -> Result<Price, PriceValidationError> {
        let brand_id = self
            .brand_id
            .ok_or(PriceValidationError::MissingField("brand_id"))?;
        let product_id = self
            .product_id
            .ok_or(PriceValidationError::MissingField("product_id"))?;
        let price_list_id = self
            .price_list_id
            .ok_or(PriceValidationError::MissingField("price_list_id"))?;
        let start_date = self
            .start_date
            .ok_or(PriceValidationError::MissingField("start_date"))?;
        let end_date = self
            .end_date
            .ok_or(PriceValidationError::MissingField("end_date"))?;
        let amount = self
            .amount
            .ok_or(PriceValidationError::MissingField("amount"))?;
        let currency = self
            .currency
            .ok_or(PriceValidationError::MissingField("currency"))?
            .parse::<Currency>()?;

        if start_date > end_date {
            return Err(PriceValidationError::InvertedInterval {
                start: start_date,
                end: end_date,
            });
        }

        if amount <= Decimal::ZERO {
            return Err(PriceValidationError::NonPositiveAmount(amount));
        }

        let priority = self.priority.unwrap_or(0);
        let priority =
            u32::try_from(priority).map_err(|_| PriceValidationError::NegativePriority(priority))?;

        Ok(Price {
            id: self.id,
            brand_id,
            product_id,
            price_list_id,
            start_date,
            end_date,
            amount,
            currency,
            priority,
        })
    }
}

/// Lookup key for the applicable price of a product at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuery {
    /// Moment the price must be valid at.
    pub instant: NaiveDateTime,
    /// Identifier of the priced product.
    pub product_id: i64,
    /// Identifier of the owning brand or chain.
    pub brand_id: i64,
}

impl PriceQuery {
    pub fn new(instant: NaiveDateTime, product_id: i64, brand_id: i64) -> Self {
        Self {
            instant,
            product_id,
            brand_id,
        }
    }
}
