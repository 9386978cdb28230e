use super::fx_model::{ExchangeRate, NewExchangeRate};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Trait defining the contract for FX repository operations.
#[async_trait]
pub trait FxRepositoryTrait: Send + Sync {
    /// Latest rate for the pair with `rate_date <= as_of`, if any.
    fn get_latest_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<ExchangeRate>>;
    fn get_rates(&self, from_currency: &str, to_currency: &str) -> Result<Vec<ExchangeRate>>;
    async fn save_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate>;
    async fn delete_rate(&self, rate_id: &str) -> Result<()>;
}

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Latest known rate with `rate_date <= as_of`. Falls back to the
    /// inverse pair when only that direction is recorded.
    fn rate_as_of(&self, from_currency: &str, to_currency: &str, as_of: NaiveDate)
        -> Result<Decimal>;

    /// Converts an amount using [`FxServiceTrait::rate_as_of`].
    fn convert_as_of(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal>;

    async fn add_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate>;
}
