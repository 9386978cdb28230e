//! Quotes module - the price oracle consumed by position and report logic.
//!
//! The concrete price feed lives outside this crate; only the lookup
//! contract is defined here.

mod quotes_errors;
mod quotes_model;
mod quotes_traits;

pub use quotes_errors::PriceOracleError;
pub use quotes_model::Quote;
pub use quotes_traits::PriceOracleTrait;
