use thiserror::Error;

/// Errors from price oracle lookups.
#[derive(Error, Debug)]
pub enum PriceOracleError {
    #[error("No price found for {symbol} in {currency} on or before {date}")]
    PriceNotFound {
        symbol: String,
        currency: String,
        date: chrono::NaiveDate,
    },

    #[error("Price provider failed: {0}")]
    ProviderFailed(String),
}
