//! Moneta Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Moneta: the append-only
//! transaction ledger, weighted-average cost positions with deferred P&L
//! recognition, and the period reports derived from them. It is
//! database-agnostic and defines traits that are implemented by storage
//! crates such as `moneta-storage-memory`.

pub mod accounts;
pub mod actions;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod ledger;
pub mod positions;
pub mod quotes;
pub mod reports;

// Re-export common types
pub use ledger::{Period, Transaction, TransactionType};
pub use positions::Position;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
