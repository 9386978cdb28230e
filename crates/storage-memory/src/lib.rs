//! Moneta in-memory storage.
//!
//! Per-run ephemeral implementations of the `moneta-core` repository
//! traits, injected wherever a persistent store is not wanted: tests,
//! dry-run imports, sandboxed report generation. State lives behind
//! `RwLock`ed maps and disappears with the process.

mod account_store;
mod fx_store;
mod ledger_store;
mod position_store;
mod price_store;

pub use account_store::MemoryAccountRepository;
pub use fx_store::MemoryFxRepository;
pub use ledger_store::MemoryLedgerRepository;
pub use position_store::MemoryPositionRepository;
pub use price_store::MemoryPriceOracle;
