use super::quotes_model::Quote;
use crate::Result;
use chrono::NaiveDate;

/// Trait defining the contract for price oracle lookups.
///
/// Implementations must be pure reads: resolution of prices happens before
/// transaction derivation, never inside it.
pub trait PriceOracleTrait: Send + Sync {
    /// Closing price for the exact date, if quoted.
    fn get_daily(&self, symbol: &str, currency: &str, date: NaiveDate) -> Result<Option<Quote>>;

    /// All quotes for the symbol with dates in `[start, end]`.
    fn get_range(
        &self,
        symbol: &str,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Quote>>;

    /// Latest quote with `quote_date <= as_of`, if any.
    fn latest_price(&self, symbol: &str, currency: &str, as_of: NaiveDate)
        -> Result<Option<Quote>>;
}
