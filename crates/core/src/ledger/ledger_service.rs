use super::derivation::derive;
use super::ledger_errors::LedgerError;
use super::ledger_model::{Transaction, TransactionDraft, TransactionFilter, TransactionStatus};
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::constants::{BASE_CURRENCY, REPORTING_CURRENCY};
use crate::errors::Result;
use crate::fx::FxServiceTrait;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Service in front of the ledger store.
///
/// Owns the impure half of transaction creation: resolving the account kind
/// and any FX rates the draft did not carry, so that derivation itself stays
/// a pure function of the draft.
#[derive(Clone)]
pub struct LedgerService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
}

impl LedgerService {
    pub fn new(
        repository: Arc<dyn LedgerRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
    ) -> Self {
        LedgerService {
            repository,
            account_repository,
            fx_service,
        }
    }

    /// Fills account kind and FX rates the draft did not supply.
    ///
    /// A rate resolved here is stamped with provenance so later edits and
    /// refunds can carry it forward unchanged.
    fn resolve_draft(&self, mut draft: TransactionDraft) -> Result<TransactionDraft> {
        if draft.account_kind.is_none() {
            let account = self.account_repository.get_account(&draft.account_id)?;
            draft.account_kind = Some(account.kind);
        }

        let local = draft.local_currency().to_string();
        let date = draft.transaction_date;
        let mut resolved_any = false;

        if draft.fx_to_usd.is_none() && local != BASE_CURRENCY {
            draft.fx_to_usd = Some(self.resolve_rate(&local, BASE_CURRENCY, date)?);
            resolved_any = true;
        }
        if draft.fx_to_vnd.is_none() && local != REPORTING_CURRENCY {
            draft.fx_to_vnd = Some(self.resolve_rate(&local, REPORTING_CURRENCY, date)?);
            resolved_any = true;
        }

        if resolved_any && draft.fx_source.is_none() {
            draft.fx_source = Some("fx_store".to_string());
            draft.fx_timestamp = Some(Utc::now());
        }

        Ok(draft)
    }

    /// Direct rate if recorded, otherwise composed through USD.
    fn resolve_rate(&self, from: &str, to: &str, date: NaiveDate) -> Result<Decimal> {
        match self.fx_service.rate_as_of(from, to, date) {
            Ok(rate) => Ok(rate),
            Err(direct_err) => {
                if from == BASE_CURRENCY || to == BASE_CURRENCY {
                    return Err(direct_err);
                }
                let to_usd = self.fx_service.rate_as_of(from, BASE_CURRENCY, date)?;
                let usd_to = self.fx_service.rate_as_of(BASE_CURRENCY, to, date)?;
                Ok(to_usd * usd_to)
            }
        }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_transaction(transaction_id)
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        self.repository.list_transactions(filter)
    }

    async fn create_transaction(&self, draft: TransactionDraft) -> Result<Transaction> {
        let resolved = self.resolve_draft(draft)?;
        let transaction = derive(&resolved)?;
        debug!(
            "Posting {} {} x {} on {} (account {})",
            transaction.transaction_type,
            transaction.quantity,
            transaction.asset,
            transaction.transaction_date,
            transaction.account_id
        );
        self.repository.create_transaction(transaction).await
    }

    async fn amend_transaction(
        &self,
        transaction_id: &str,
        mut draft: TransactionDraft,
    ) -> Result<Transaction> {
        let existing = self.repository.get_transaction(transaction_id)?;
        if existing.status == TransactionStatus::Void {
            return Err(LedgerError::VoidTransaction(transaction_id.to_string()).into());
        }

        // FX provenance must survive edits unchanged.
        draft.id = Some(existing.id.clone());
        draft.fx_source = existing.fx_source.clone();
        draft.fx_timestamp = existing.fx_timestamp;

        let resolved = self.resolve_draft(draft)?;
        let mut amended = derive(&resolved)?;
        amended.fx_source = existing.fx_source;
        amended.fx_timestamp = existing.fx_timestamp;
        amended.created_at = existing.created_at;
        amended.updated_at = Utc::now();

        self.repository.update_transaction(amended).await
    }

    async fn void_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let mut existing = self.repository.get_transaction(transaction_id)?;
        existing.status = TransactionStatus::Void;
        existing.updated_at = Utc::now();
        self.repository.update_transaction(existing).await
    }

    async fn stamp_exit_date(
        &self,
        transaction_id: &str,
        exit_date: NaiveDate,
    ) -> Result<Transaction> {
        let mut existing = self.repository.get_transaction(transaction_id)?;
        existing.exit_date = Some(exit_date);
        existing.updated_at = Utc::now();
        self.repository.update_transaction(existing).await
    }
}
