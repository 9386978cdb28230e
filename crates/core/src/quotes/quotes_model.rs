//! Quote domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A daily closing price for an asset in a given currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub currency: String,
    pub quote_date: NaiveDate,
    pub price: Decimal,
    pub source: String,
}
