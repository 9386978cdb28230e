use thiserror::Error;

/// Errors from exchange-rate resolution.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
}
