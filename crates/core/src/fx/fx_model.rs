//! Exchange rate domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dated exchange rate between two currencies.
///
/// `rate` is the multiplier taking one unit of `from_currency` into
/// `to_currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    /// Effective date of the quote; report lookups take the latest rate
    /// with `rate_date <= as_of`.
    pub rate_date: NaiveDate,
    /// Where the rate came from (provider name or "manual").
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Input model for recording a new exchange rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub rate_date: NaiveDate,
    pub source: Option<String>,
}
