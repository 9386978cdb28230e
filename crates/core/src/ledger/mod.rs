//! Ledger module - transaction models, derivation, and the ledger service.

mod derivation;
mod ledger_constants;
mod ledger_errors;
mod ledger_model;
mod ledger_service;
mod ledger_traits;

#[cfg(test)]
mod derivation_tests;

#[cfg(test)]
mod ledger_service_tests;

pub use derivation::derive;
pub use ledger_constants::*;
pub use ledger_errors::LedgerError;
pub use ledger_model::{
    CashFlowDirection, Period, QuantityDirection, Transaction, TransactionDraft, TransactionFilter,
    TransactionStatus, TransactionType,
};
pub use ledger_service::LedgerService;
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
