//! Position and closure-link domain models.

use crate::ledger::{Transaction, TransactionType};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate cost-basis record for one logical holding.
///
/// One position per (asset, account) for plain holdings, or addressed by an
/// explicit id/name for staking and vault flows. The weighted-average
/// deposit unit cost is recomputed on every deposit; there is no per-lot
/// tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    /// Optional caller-facing handle for staking/vault flows.
    pub name: Option<String>,
    pub asset: String,
    pub account_id: String,

    pub deposit_qty: Decimal,
    /// Total cost basis in USD.
    pub deposit_cost: Decimal,
    /// Weighted average: deposit_cost / deposit_qty.
    pub deposit_unit_cost: Decimal,

    pub withdrawal_qty: Decimal,
    pub withdrawal_value: Decimal,
    pub withdrawal_unit_price: Decimal,

    /// Realized figures; zero while the position is open.
    pub pnl: Decimal,
    pub pnl_percent: Decimal,

    pub is_open: bool,
    pub horizon: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
    /// The originating deposit transaction. Its nullable `exit_date` is the
    /// sole closed signal used by reporting.
    pub entry_tx_id: Option<String>,

    // Vault aliasing; shares the cost-basis fields above.
    #[serde(default)]
    pub is_vault: bool,
    pub vault_name: Option<String>,
    pub vault_status: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    pub fn new(asset: impl Into<String>, account_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Position {
            id: uuid::Uuid::new_v4().to_string(),
            name: None,
            asset: asset.into(),
            account_id: account_id.into(),
            deposit_qty: Decimal::ZERO,
            deposit_cost: Decimal::ZERO,
            deposit_unit_cost: Decimal::ZERO,
            withdrawal_qty: Decimal::ZERO,
            withdrawal_value: Decimal::ZERO,
            withdrawal_unit_price: Decimal::ZERO,
            pnl: Decimal::ZERO,
            pnl_percent: Decimal::ZERO,
            is_open: true,
            horizon: None,
            entry_date: None,
            exit_date: None,
            entry_tx_id: None,
            is_vault: false,
            vault_name: None,
            vault_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// May go negative: over-withdrawal is accepted, not rejected.
    pub fn remaining_qty(&self) -> Decimal {
        self.deposit_qty - self.withdrawal_qty
    }

    /// Accumulates a deposit and recomputes the weighted average.
    pub fn apply_deposit(&mut self, quantity: Decimal, unit_cost: Decimal) {
        self.deposit_qty += quantity;
        self.deposit_cost += quantity * unit_cost;
        if !self.deposit_qty.is_zero() {
            self.deposit_unit_cost = self.deposit_cost / self.deposit_qty;
        }
        self.updated_at = Utc::now();
    }

    /// Accumulates a withdrawal. No P&L is recognized here; that waits for
    /// the closure read path.
    pub fn apply_withdrawal(&mut self, quantity: Decimal, value: Decimal) {
        self.withdrawal_qty += quantity;
        self.withdrawal_value += value;
        if !self.withdrawal_qty.is_zero() {
            self.withdrawal_unit_price = self.withdrawal_value / self.withdrawal_qty;
        }
        self.updated_at = Utc::now();
    }
}

/// Closed-state of a position, derived from the originating deposit
/// transaction's nullable exit date.
///
/// Never inferred from `remaining_qty == 0`: a partial-unstake sequence that
/// happens to sum exactly to the deposit quantity without close_all stays
/// open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PositionState {
    Open,
    Closed { exit_date: NaiveDate },
}

impl PositionState {
    pub fn from_deposit(deposit: &Transaction) -> Self {
        match deposit.exit_date {
            Some(exit_date) => PositionState::Closed { exit_date },
            None => PositionState::Open,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, PositionState::Closed { .. })
    }
}

/// Records one deposit/withdrawal pairing.
///
/// One link per withdrawal event. The deposit unit cost is snapshotted at
/// link time so later deposits cannot rewrite already-recorded basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureLink {
    pub id: String,
    /// The originating deposit transaction.
    pub from_tx_id: String,
    /// The withdrawal transaction.
    pub to_tx_id: String,
    pub position_id: String,
    pub link_type: String,
    pub withdrawal_qty: Decimal,
    pub withdrawal_value: Decimal,
    pub deposit_unit_cost: Decimal,
    /// Back-stamped when the deposit is closed; links without it fall back
    /// to the proportional P&L estimate.
    pub exit_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// How callers address a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionRef {
    Id(String),
    Name(String),
}

/// Filter for listing positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionStatusFilter {
    Open,
    Closed,
    #[default]
    All,
}

/// Input for a deposit/stake into a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    /// Accumulate into this position when it resolves; otherwise a new
    /// position is created.
    pub position_ref: Option<PositionRef>,
    /// Name given to a newly created position.
    pub name: Option<String>,
    pub asset: String,
    pub account_id: String,
    pub quantity: Decimal,
    /// Explicit unit cost in USD; when absent the price oracle is consulted
    /// for the deposit date.
    pub unit_cost_usd: Option<Decimal>,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub horizon: Option<String>,
    #[serde(default)]
    pub is_vault: bool,
    pub vault_name: Option<String>,
}

/// Input for a withdrawal/unstake out of a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub position_ref: PositionRef,
    /// Ignored when `close_all` is set.
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub close_all: bool,
    /// Exit price resolution priority: explicit unit price, then total
    /// value divided by quantity, then the price oracle.
    pub exit_unit_price: Option<Decimal>,
    pub exit_total_usd: Option<Decimal>,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
}

/// Result of a withdrawal: the mutated position, the ledger entry, and the
/// link recorded between deposit and withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawOutcome {
    pub position: Position,
    pub transaction: Transaction,
    pub link: ClosureLink,
}
