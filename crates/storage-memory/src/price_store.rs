use chrono::NaiveDate;
use moneta_core::quotes::{PriceOracleTrait, Quote};
use moneta_core::Result;
use rust_decimal::Decimal;
use std::sync::RwLock;

/// Price oracle backed by manually seeded quotes.
///
/// Stands in for an external feed; callers seed the daily prices the run
/// needs before any valuation happens.
#[derive(Default)]
pub struct MemoryPriceOracle {
    quotes: RwLock<Vec<Quote>>,
}

impl MemoryPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&self, symbol: &str, currency: &str, quote_date: NaiveDate, price: Decimal) {
        let mut quotes = self.quotes.write().expect("price store lock poisoned");
        quotes.retain(|q| {
            !(q.symbol == symbol && q.currency == currency && q.quote_date == quote_date)
        });
        quotes.push(Quote {
            symbol: symbol.to_string(),
            currency: currency.to_string(),
            quote_date,
            price,
            source: "memory".to_string(),
        });
    }
}

impl PriceOracleTrait for MemoryPriceOracle {
    fn get_daily(&self, symbol: &str, currency: &str, date: NaiveDate) -> Result<Option<Quote>> {
        Ok(self
            .quotes
            .read()
            .expect("price store lock poisoned")
            .iter()
            .find(|q| q.symbol == symbol && q.currency == currency && q.quote_date == date)
            .cloned())
    }

    fn get_range(
        &self,
        symbol: &str,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Quote>> {
        let mut quotes: Vec<Quote> = self
            .quotes
            .read()
            .expect("price store lock poisoned")
            .iter()
            .filter(|q| {
                q.symbol == symbol
                    && q.currency == currency
                    && q.quote_date >= start
                    && q.quote_date <= end
            })
            .cloned()
            .collect();
        quotes.sort_by_key(|q| q.quote_date);
        Ok(quotes)
    }

    fn latest_price(
        &self,
        symbol: &str,
        currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<Quote>> {
        Ok(self
            .quotes
            .read()
            .expect("price store lock poisoned")
            .iter()
            .filter(|q| q.symbol == symbol && q.currency == currency && q.quote_date <= as_of)
            .max_by_key(|q| q.quote_date)
            .cloned())
    }
}
