mod spending_model;
mod spending_service;

#[cfg(test)]
mod spending_tests;

pub use spending_model::{DaySpend, SpendingReport, TagSpend};
pub use spending_service::SpendingService;
