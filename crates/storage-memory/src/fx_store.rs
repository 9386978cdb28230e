use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use moneta_core::errors::DatabaseError;
use moneta_core::fx::{ExchangeRate, FxRepositoryTrait, NewExchangeRate};
use moneta_core::Result;
use std::sync::RwLock;
use uuid::Uuid;

/// Exchange-rate store.
#[derive(Default)]
pub struct MemoryFxRepository {
    rates: RwLock<Vec<ExchangeRate>>,
}

impl MemoryFxRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FxRepositoryTrait for MemoryFxRepository {
    fn get_latest_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<ExchangeRate>> {
        Ok(self
            .rates
            .read()
            .expect("fx store lock poisoned")
            .iter()
            .filter(|r| {
                r.from_currency == from_currency
                    && r.to_currency == to_currency
                    && r.rate_date <= as_of
            })
            .max_by_key(|r| r.rate_date)
            .cloned())
    }

    fn get_rates(&self, from_currency: &str, to_currency: &str) -> Result<Vec<ExchangeRate>> {
        let mut rates: Vec<ExchangeRate> = self
            .rates
            .read()
            .expect("fx store lock poisoned")
            .iter()
            .filter(|r| r.from_currency == from_currency && r.to_currency == to_currency)
            .cloned()
            .collect();
        rates.sort_by_key(|r| r.rate_date);
        Ok(rates)
    }

    async fn save_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate> {
        let rate = ExchangeRate {
            id: Uuid::new_v4().to_string(),
            from_currency: new_rate.from_currency,
            to_currency: new_rate.to_currency,
            rate: new_rate.rate,
            rate_date: new_rate.rate_date,
            source: new_rate.source.unwrap_or_else(|| "manual".to_string()),
            created_at: Utc::now(),
        };
        let mut rates = self.rates.write().expect("fx store lock poisoned");
        // One rate per pair per day; a re-save replaces it.
        rates.retain(|r| {
            !(r.from_currency == rate.from_currency
                && r.to_currency == rate.to_currency
                && r.rate_date == rate.rate_date)
        });
        rates.push(rate.clone());
        Ok(rate)
    }

    async fn delete_rate(&self, rate_id: &str) -> Result<()> {
        let mut rates = self.rates.write().expect("fx store lock poisoned");
        let before = rates.len();
        rates.retain(|r| r.id != rate_id);
        if rates.len() == before {
            return Err(DatabaseError::NotFound(rate_id.to_string()).into());
        }
        Ok(())
    }
}
