//! FX module - exchange rates and currency rounding.

mod currency;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;


pub use currency::{decimal_places, round_currency};
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, NewExchangeRate};
pub use fx_service::FxService;
pub use fx_traits::{FxRepositoryTrait, FxServiceTrait};
