use async_trait::async_trait;
use moneta_core::errors::DatabaseError;
use moneta_core::ledger::{LedgerRepositoryTrait, TransactionFilter};
use moneta_core::{Result, Transaction};
use std::collections::HashMap;
use std::sync::RwLock;

/// Ledger store backed by a map keyed by transaction id.
///
/// Listing returns entries ordered by transaction date, then creation
/// time, so scans are stable across calls.
#[derive(Default)]
pub struct MemoryLedgerRepository {
    transactions: RwLock<HashMap<String, Transaction>>,
}

impl MemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerRepositoryTrait for MemoryLedgerRepository {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transactions
            .read()
            .expect("ledger store lock poisoned")
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(transaction_id.to_string()).into())
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .read()
            .expect("ledger store lock poisoned")
            .values()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            a.transaction_date
                .cmp(&b.transaction_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(transactions)
    }

    async fn create_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        let mut transactions = self
            .transactions
            .write()
            .expect("ledger store lock poisoned");
        if transactions.contains_key(&transaction.id) {
            return Err(DatabaseError::UniqueViolation(transaction.id.clone()).into());
        }
        transactions.insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        let mut transactions = self
            .transactions
            .write()
            .expect("ledger store lock poisoned");
        if !transactions.contains_key(&transaction.id) {
            return Err(DatabaseError::NotFound(transaction.id.clone()).into());
        }
        transactions.insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        let removed = self
            .transactions
            .write()
            .expect("ledger store lock poisoned")
            .remove(transaction_id);
        match removed {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(transaction_id.to_string()).into()),
        }
    }
}
