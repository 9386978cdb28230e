use crate::ledger::Transaction;
use crate::positions::PositionRef;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters for stake and deposit actions; both open or grow a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositParams {
    /// Existing position to grow; omitted to create one keyed by `name`.
    pub position: Option<PositionRef>,
    pub name: Option<String>,
    pub asset: String,
    pub account_id: String,
    pub quantity: Decimal,
    pub unit_cost_usd: Option<Decimal>,
    pub date: NaiveDate,
    pub horizon: Option<String>,
    #[serde(default)]
    pub is_vault: bool,
    pub vault_name: Option<String>,
}

/// Parameters for unstake and withdraw actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawParams {
    pub position: PositionRef,
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub close_all: bool,
    pub exit_unit_price: Option<Decimal>,
    pub exit_total_usd: Option<Decimal>,
    pub date: NaiveDate,
    /// Account receiving the proceeds; defaults to the position's account.
    pub to_account_id: Option<String>,
}

pub type UnstakeParams = WithdrawParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepayBorrowParams {
    pub account_id: String,
    pub amount_usd: Decimal,
    pub date: NaiveDate,
    pub counterparty: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalTransferParams {
    pub from_account_id: String,
    pub to_account_id: String,
    pub asset: String,
    pub quantity: Decimal,
    pub price_usd: Option<Decimal>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitBalanceParams {
    pub account_id: String,
    pub asset: String,
    pub quantity: Decimal,
    pub price_usd: Option<Decimal>,
    pub date: NaiveDate,
}

/// The tagged request envelope: `{"action": "...", "params": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "snake_case")]
pub enum ActionRequest {
    Stake(DepositParams),
    Unstake(UnstakeParams),
    Deposit(DepositParams),
    Withdraw(WithdrawParams),
    RepayBorrow(RepayBorrowParams),
    InternalTransfer(InternalTransferParams),
    InitBalance(InitBalanceParams),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub transactions: Vec<Transaction>,
}
