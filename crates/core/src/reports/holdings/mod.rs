mod holdings_model;
mod holdings_service;


pub use holdings_model::{Holding, HoldingGroup, HoldingsBreakdown, HoldingsReport};
pub use holdings_service::HoldingsService;
