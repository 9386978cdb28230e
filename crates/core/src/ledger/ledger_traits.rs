use super::ledger_model::{Transaction, TransactionDraft, TransactionFilter};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait defining the contract for ledger repository operations.
///
/// The store is append-only from the service's point of view:
/// `update_transaction` exists for amends and exit-date stamping, and
/// `delete_transaction` only for the vault-delete cascade. Multi-record
/// mutations issued inside one service call must be applied atomically.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    async fn create_transaction(&self, transaction: Transaction) -> Result<Transaction>;
    async fn update_transaction(&self, transaction: Transaction) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<()>;
}

/// Trait defining the contract for ledger service operations.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    /// Resolves account kind and missing FX rates, derives, and persists.
    async fn create_transaction(&self, draft: TransactionDraft) -> Result<Transaction>;

    /// Fully re-derives the entry from the new draft. FX provenance and the
    /// original creation stamp are preserved.
    async fn amend_transaction(&self, transaction_id: &str, draft: TransactionDraft)
        -> Result<Transaction>;

    /// Soft-deletes the entry. Void entries are excluded from every scan.
    async fn void_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Stamps the closed signal onto a deposit entry. Everything else on the
    /// record, FX provenance included, is left untouched.
    async fn stamp_exit_date(
        &self,
        transaction_id: &str,
        exit_date: NaiveDate,
    ) -> Result<Transaction>;
}
