use super::positions_errors::PositionError;
use super::positions_model::{
    ClosureLink, DepositRequest, Position, PositionRef, PositionState, PositionStatusFilter,
    WithdrawOutcome, WithdrawRequest,
};
use super::positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
use super::realization::{annualized_roi, closure_realized, roi_percent, RealizedPnl};
use crate::constants::{BASE_CURRENCY, LINK_TYPE_STAKE_UNSTAKE};
use crate::errors::{Result, ValidationError};
use crate::fx::round_currency;
use crate::ledger::{
    LedgerRepositoryTrait, LedgerServiceTrait, Period, Transaction, TransactionDraft,
    TransactionFilter,
};
use crate::quotes::{PriceOracleError, PriceOracleTrait};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Position lifecycle service.
///
/// Serializes mutation of a given position behind a lock keyed by position
/// id, so concurrent withdrawals cannot interleave the read-modify-write of
/// the weighted unit cost and remaining quantity. Reporting reads stay
/// lock-free.
pub struct PositionService {
    repository: Arc<dyn PositionRepositoryTrait>,
    ledger_service: Arc<dyn LedgerServiceTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    price_oracle: Arc<dyn PriceOracleTrait>,
    locks: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

impl PositionService {
    pub fn new(
        repository: Arc<dyn PositionRepositoryTrait>,
        ledger_service: Arc<dyn LedgerServiceTrait>,
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        price_oracle: Arc<dyn PriceOracleTrait>,
    ) -> Self {
        PositionService {
            repository,
            ledger_service,
            ledger_repository,
            price_oracle,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, position_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .entry(position_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Id refs must exist; name refs that resolve to nothing mean "create".
    fn resolve_ref(&self, position_ref: &PositionRef) -> Result<Option<Position>> {
        match position_ref {
            PositionRef::Id(id) => Ok(Some(self.repository.get_position(id)?)),
            PositionRef::Name(name) => self.repository.get_position_by_name(name),
        }
    }

    fn oracle_price(&self, asset: &str, date: NaiveDate) -> Result<Decimal> {
        match self.price_oracle.latest_price(asset, BASE_CURRENCY, date)? {
            Some(quote) => Ok(quote.price),
            None => Err(PriceOracleError::PriceNotFound {
                symbol: asset.to_string(),
                currency: BASE_CURRENCY.to_string(),
                date,
            }
            .into()),
        }
    }

    /// Exit unit price priority: explicit unit price, then total value over
    /// quantity, then the oracle.
    fn resolve_exit_price(
        &self,
        request: &WithdrawRequest,
        asset: &str,
        quantity: Decimal,
    ) -> Result<Decimal> {
        if let Some(price) = request.exit_unit_price {
            return Ok(price);
        }
        if let Some(total) = request.exit_total_usd {
            if quantity.is_zero() {
                return Ok(Decimal::ZERO);
            }
            return Ok(total / quantity);
        }
        self.oracle_price(asset, request.date)
    }
}

#[async_trait]
impl PositionServiceTrait for PositionService {
    fn get_position(&self, position_id: &str) -> Result<Position> {
        self.repository.get_position(position_id)
    }

    fn list_positions(&self, filter: PositionStatusFilter) -> Result<Vec<Position>> {
        self.repository.list_positions(filter)
    }

    async fn deposit(&self, request: DepositRequest) -> Result<(Position, Transaction)> {
        if request.quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "deposit quantity must be positive".to_string(),
            )
            .into());
        }

        let unit_cost = match request.unit_cost_usd {
            Some(cost) => cost,
            None => self.oracle_price(&request.asset, request.date)?,
        };
        if unit_cost.is_sign_negative() {
            return Err(ValidationError::NegativeAmount {
                field: "unitCostUsd".to_string(),
                value: unit_cost.to_string(),
            }
            .into());
        }

        let existing = match &request.position_ref {
            Some(position_ref) => self.resolve_ref(position_ref)?,
            None => None,
        };

        if let Some(position) = existing {
            let lock = self.lock_for(&position.id);
            let _guard = lock.lock().await;
            // Re-read inside the critical section; a close may have landed
            // while this deposit waited on the lock, so the status check
            // must happen on the re-read.
            let mut position = self.repository.get_position(&position.id)?;
            if !position.is_open {
                return Err(PositionError::ClosurePolicy(format!(
                    "position {} is closed and cannot accept deposits",
                    position.id
                ))
                .into());
            }

            let mut draft = TransactionDraft::new(
                request.date,
                request.transaction_type,
                request.asset.clone(),
                request.account_id.clone(),
                request.quantity,
                unit_cost,
            );
            draft.position_id = Some(position.id.clone());
            draft.horizon = request.horizon.clone();
            draft.entry_date = Some(request.date);
            let transaction = self.ledger_service.create_transaction(draft).await?;

            position.apply_deposit(request.quantity, unit_cost);
            let position = self.repository.update_position(position).await?;
            return Ok((position, transaction));
        }

        // New position.
        let mut position = Position::new(request.asset.clone(), request.account_id.clone());
        position.name = request.name.clone().or_else(|| match &request.position_ref {
            Some(PositionRef::Name(name)) => Some(name.clone()),
            _ => None,
        });
        position.horizon = request.horizon.clone();
        position.entry_date = Some(request.date);
        position.is_vault = request.is_vault;
        position.vault_name = request.vault_name.clone();
        if request.is_vault {
            position.vault_status = Some("active".to_string());
        }

        let mut draft = TransactionDraft::new(
            request.date,
            request.transaction_type,
            request.asset.clone(),
            request.account_id.clone(),
            request.quantity,
            unit_cost,
        );
        draft.position_id = Some(position.id.clone());
        draft.horizon = request.horizon.clone();
        draft.entry_date = Some(request.date);
        let transaction = self.ledger_service.create_transaction(draft).await?;

        position.entry_tx_id = Some(transaction.id.clone());
        position.apply_deposit(request.quantity, unit_cost);
        let position = self.repository.create_position(position).await?;

        debug!(
            "Opened position {} ({} in {})",
            position.id, position.asset, position.account_id
        );
        Ok((position, transaction))
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<WithdrawOutcome> {
        let resolved = self.resolve_ref(&request.position_ref)?.ok_or_else(|| {
            PositionError::NotFound(format!("{:?}", request.position_ref))
        })?;

        let lock = self.lock_for(&resolved.id);
        let _guard = lock.lock().await;
        let mut position = self.repository.get_position(&resolved.id)?;

        let entry_tx_id = position
            .entry_tx_id
            .clone()
            .ok_or_else(|| PositionError::MissingEntryTransaction(position.id.clone()))?;

        // close_all forces the full remaining quantity; any caller-supplied
        // quantity is ignored.
        let quantity = if request.close_all {
            let remaining = position.remaining_qty();
            if remaining.is_sign_negative() {
                warn!(
                    "Closing over-withdrawn position {} (remaining {})",
                    position.id, remaining
                );
            }
            remaining.max(Decimal::ZERO)
        } else {
            let quantity = request
                .quantity
                .ok_or_else(|| ValidationError::MissingField("quantity".to_string()))?;
            if quantity.is_sign_negative() {
                return Err(ValidationError::NegativeAmount {
                    field: "quantity".to_string(),
                    value: quantity.to_string(),
                }
                .into());
            }
            // Blackbox policy: not validated against the remaining balance.
            quantity
        };

        let exit_price = self.resolve_exit_price(&request, &position.asset, quantity)?;
        let value = round_currency(quantity * exit_price, BASE_CURRENCY);

        let mut draft = TransactionDraft::new(
            request.date,
            request.transaction_type,
            position.asset.clone(),
            position.account_id.clone(),
            quantity,
            exit_price,
        );
        draft.position_id = Some(position.id.clone());
        let transaction = self.ledger_service.create_transaction(draft).await?;

        let link = ClosureLink {
            id: Uuid::new_v4().to_string(),
            from_tx_id: entry_tx_id.clone(),
            to_tx_id: transaction.id.clone(),
            position_id: position.id.clone(),
            link_type: LINK_TYPE_STAKE_UNSTAKE.to_string(),
            withdrawal_qty: quantity,
            withdrawal_value: value,
            deposit_unit_cost: position.deposit_unit_cost,
            exit_date: None,
            created_at: Utc::now(),
        };
        let mut link = self.repository.create_closure_link(link).await?;

        position.apply_withdrawal(quantity, value);

        if request.close_all {
            let deposit = self
                .ledger_service
                .stamp_exit_date(&entry_tx_id, request.date)
                .await?;

            // Back-stamp every link of this deposit so the exact formula
            // applies to the whole history.
            let mut stamped = Vec::new();
            for mut existing in self.repository.get_links_by_deposit(&entry_tx_id)? {
                if existing.exit_date.is_none() {
                    existing.exit_date = Some(request.date);
                    existing = self.repository.update_closure_link(existing).await?;
                }
                if existing.id == link.id {
                    link = existing.clone();
                }
                stamped.push(existing);
            }

            let (pnl, cost_basis) = closure_realized(&stamped, &deposit, Some(&position));
            position.pnl = pnl;
            position.pnl_percent = roi_percent(pnl, cost_basis);
            position.is_open = false;
            position.exit_date = Some(request.date);
            if position.is_vault {
                position.vault_status = Some("closed".to_string());
            }
            debug!(
                "Closed position {} with realized pnl {} ({}%)",
                position.id, position.pnl, position.pnl_percent
            );
        }

        let position = self.repository.update_position(position).await?;
        Ok(WithdrawOutcome {
            position,
            transaction,
            link,
        })
    }

    fn realized_pnl(&self, period: &Period) -> Result<RealizedPnl> {
        let mut links_by_deposit: HashMap<String, Vec<ClosureLink>> = HashMap::new();
        for link in self.repository.list_closure_links()? {
            links_by_deposit
                .entry(link.from_tx_id.clone())
                .or_default()
                .push(link);
        }

        let mut total_pnl = Decimal::ZERO;
        let mut total_basis = Decimal::ZERO;
        let mut first_entry: Option<NaiveDate> = None;
        let mut last_exit: Option<NaiveDate> = None;

        for (from_tx_id, links) in links_by_deposit {
            let deposit = match self.ledger_repository.get_transaction(&from_tx_id) {
                Ok(tx) => tx,
                Err(e) => {
                    warn!("Closure link references missing deposit {}: {}", from_tx_id, e);
                    continue;
                }
            };
            let exit_date = match PositionState::from_deposit(&deposit) {
                PositionState::Closed { exit_date } if period.contains(exit_date) => exit_date,
                _ => continue,
            };

            let position = links
                .first()
                .and_then(|link| self.repository.get_position(&link.position_id).ok());
            let (pnl, basis) = closure_realized(&links, &deposit, position.as_ref());
            total_pnl += pnl;
            total_basis += basis;

            let entry = deposit.entry_date.unwrap_or(deposit.transaction_date);
            first_entry = Some(first_entry.map_or(entry, |d| d.min(entry)));
            last_exit = Some(last_exit.map_or(exit_date, |d| d.max(exit_date)));
        }

        let roi_pct = roi_percent(total_pnl, total_basis);
        let held_days = match (first_entry, last_exit) {
            (Some(entry), Some(exit)) => Some((exit - entry).num_days()),
            _ => None,
        };

        Ok(RealizedPnl {
            pnl_usd: total_pnl,
            cost_basis_usd: total_basis,
            roi_pct,
            annualized_roi_pct: annualized_roi(roi_pct, held_days),
        })
    }

    async fn delete_vault(&self, position_id: &str) -> Result<()> {
        let position = self.repository.get_position(position_id)?;
        if !position.is_vault {
            return Err(ValidationError::InvalidInput(format!(
                "position {} is not a vault",
                position_id
            ))
            .into());
        }

        let lock = self.lock_for(position_id);
        let _guard = lock.lock().await;

        let filter = TransactionFilter {
            position_id: Some(position_id.to_string()),
            include_void: true,
            ..Default::default()
        };
        for transaction in self.ledger_repository.list_transactions(&filter)? {
            self.ledger_repository
                .delete_transaction(&transaction.id)
                .await?;
        }

        self.repository.delete_links_by_position(position_id).await?;
        self.repository.delete_position(position_id).await?;
        debug!("Deleted vault position {} and its transactions", position_id);
        Ok(())
    }
}
