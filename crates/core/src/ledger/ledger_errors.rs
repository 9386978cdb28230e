use thiserror::Error;

/// Errors specific to ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The ledger is append-only: posted entries are corrected by amending
    /// (full re-derive) or voiding, never edited in place.
    #[error("Transaction {0} is void and cannot be modified")]
    VoidTransaction(String),
}
