use super::fx_errors::FxError;
use super::fx_model::{ExchangeRate, NewExchangeRate};
use super::fx_traits::{FxRepositoryTrait, FxServiceTrait};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Clone)]
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
}

impl FxService {
    pub fn new(repository: Arc<dyn FxRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn validate_code(code: &str) -> Result<()> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FxError::InvalidCurrencyCode(code.to_string()).into());
        }
        Ok(())
    }

    fn load_rate_as_of(&self, from: &str, to: &str, as_of: NaiveDate) -> Result<Decimal> {
        if let Some(rate) = self.repository.get_latest_rate(from, to, as_of)? {
            return Ok(rate.rate);
        }

        // Only the inverse direction may be recorded.
        if let Some(inverse) = self.repository.get_latest_rate(to, from, as_of)? {
            if inverse.rate.is_zero() {
                return Err(FxError::InvalidRate(format!(
                    "zero rate recorded for {}/{} on {}",
                    to, from, inverse.rate_date
                ))
                .into());
            }
            return Ok(Decimal::ONE / inverse.rate);
        }

        Err(FxError::RateNotFound(format!("{}/{} as of {}", from, to, as_of)).into())
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn rate_as_of(
        &self,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal> {
        Self::validate_code(from_currency)?;
        Self::validate_code(to_currency)?;

        if from_currency == to_currency {
            return Ok(Decimal::ONE);
        }

        self.load_rate_as_of(from_currency, to_currency, as_of)
    }

    fn convert_as_of(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal> {
        if from_currency == to_currency {
            return Ok(amount);
        }
        let rate = self.rate_as_of(from_currency, to_currency, as_of)?;
        Ok(amount * rate)
    }

    async fn add_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate> {
        if new_rate.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "rate for {}/{} must be positive, got {}",
                new_rate.from_currency, new_rate.to_currency, new_rate.rate
            ))
            .into());
        }
        Self::validate_code(&new_rate.from_currency)?;
        Self::validate_code(&new_rate.to_currency)?;

        self.repository.save_rate(new_rate).await
    }
}
