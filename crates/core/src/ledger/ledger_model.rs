//! Transaction domain models.

use crate::accounts::AccountKind;
use crate::constants::BASE_CURRENCY;
use crate::errors::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed taxonomy of ledger entry types.
///
/// Direction never comes from the sign of an amount: quantity is always a
/// non-negative magnitude and the type determines the signed balance and
/// cash-flow deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Buy,
    Sell,
    Expense,
    Income,
    Deposit,
    Withdraw,
    Stake,
    Unstake,
    Transfer,
    TransferIn,
    TransferOut,
    Borrow,
    RepayBorrow,
    InterestExpense,
    Fee,
    Tax,
    Reward,
    Yield,
    Valuation,
    Refund,
}

/// Signed direction of the balance change a transaction type implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityDirection {
    Increase,
    Decrease,
    Neutral,
}

/// Direction of the external cash movement a transaction type implies,
/// before the internal-flow and credit-card overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlowDirection {
    Inflow,
    Outflow,
    Neutral,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
            TransactionType::Stake => "stake",
            TransactionType::Unstake => "unstake",
            TransactionType::Transfer => "transfer",
            TransactionType::TransferIn => "transfer_in",
            TransactionType::TransferOut => "transfer_out",
            TransactionType::Borrow => "borrow",
            TransactionType::RepayBorrow => "repay_borrow",
            TransactionType::InterestExpense => "interest_expense",
            TransactionType::Fee => "fee",
            TransactionType::Tax => "tax",
            TransactionType::Reward => "reward",
            TransactionType::Yield => "yield",
            TransactionType::Valuation => "valuation",
            TransactionType::Refund => "refund",
        }
    }

    /// Sign of the quantity delta for this type.
    ///
    /// `borrow` is the asset side of a loan draw: the drawn funds appear as
    /// a balance increase. A credit-card `expense` still decreases quantity
    /// even though its cash flow is forced to zero.
    pub fn quantity_direction(&self) -> QuantityDirection {
        match self {
            TransactionType::Buy
            | TransactionType::Deposit
            | TransactionType::Income
            | TransactionType::TransferIn
            | TransactionType::Stake
            | TransactionType::Reward
            | TransactionType::Yield
            | TransactionType::Borrow
            | TransactionType::Refund => QuantityDirection::Increase,
            TransactionType::Sell
            | TransactionType::Withdraw
            | TransactionType::Expense
            | TransactionType::TransferOut
            | TransactionType::Unstake
            | TransactionType::RepayBorrow
            | TransactionType::Fee
            | TransactionType::Tax
            | TransactionType::InterestExpense => QuantityDirection::Decrease,
            TransactionType::Transfer | TransactionType::Valuation => QuantityDirection::Neutral,
        }
    }

    /// Direction of external cash movement for this type, before the
    /// internal-flow and credit-card overrides applied during derivation.
    pub fn cash_flow_direction(&self) -> CashFlowDirection {
        match self {
            TransactionType::Sell
            | TransactionType::Income
            | TransactionType::Deposit
            | TransactionType::TransferIn
            | TransactionType::Borrow
            | TransactionType::Unstake
            | TransactionType::Withdraw
            | TransactionType::Reward
            | TransactionType::Yield
            | TransactionType::Refund => CashFlowDirection::Inflow,
            TransactionType::Buy
            | TransactionType::Expense
            | TransactionType::RepayBorrow
            | TransactionType::Stake
            | TransactionType::TransferOut
            | TransactionType::Fee
            | TransactionType::Tax
            | TransactionType::InterestExpense => CashFlowDirection::Outflow,
            TransactionType::Transfer | TransactionType::Valuation => CashFlowDirection::Neutral,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TransactionType::Buy),
            "sell" => Ok(TransactionType::Sell),
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            "deposit" => Ok(TransactionType::Deposit),
            "withdraw" => Ok(TransactionType::Withdraw),
            "stake" => Ok(TransactionType::Stake),
            "unstake" => Ok(TransactionType::Unstake),
            "transfer" => Ok(TransactionType::Transfer),
            "transfer_in" => Ok(TransactionType::TransferIn),
            "transfer_out" => Ok(TransactionType::TransferOut),
            "borrow" => Ok(TransactionType::Borrow),
            "repay_borrow" => Ok(TransactionType::RepayBorrow),
            "interest_expense" => Ok(TransactionType::InterestExpense),
            "fee" => Ok(TransactionType::Fee),
            "tax" => Ok(TransactionType::Tax),
            "reward" => Ok(TransactionType::Reward),
            "yield" => Ok(TransactionType::Yield),
            "valuation" => Ok(TransactionType::Valuation),
            "refund" => Ok(TransactionType::Refund),
            other => Err(ValidationError::UnknownTransactionType(other.to_string())),
        }
    }
}

/// Transaction lifecycle status.
///
/// The ledger is append-only: entries are never hard-deleted through the
/// service layer, only voided. Void entries are excluded from every scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Posted,
    Void,
}

/// A fully derived, storable ledger record.
///
/// Immutable once persisted, except through an explicit amend that fully
/// re-derives the record. FX provenance (`fx_source`, `fx_timestamp`)
/// survives amends unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    // Identity
    pub id: String,
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,

    // Inputs
    pub asset: String,
    pub account_id: String,
    /// Non-negative magnitude; direction comes from the type.
    pub quantity: Decimal,
    pub price_local: Decimal,
    pub local_currency: String,
    pub fx_to_usd: Decimal,
    pub fx_to_vnd: Decimal,
    pub fee_local: Decimal,
    pub fee_usd: Decimal,
    pub fee_vnd: Decimal,
    pub counterparty: Option<String>,
    pub tag: Option<String>,
    pub note: Option<String>,
    pub position_id: Option<String>,
    pub horizon: Option<String>,
    pub entry_date: Option<NaiveDate>,
    /// Stamped onto the originating deposit at closure; the sole "closed"
    /// signal used by reporting.
    pub exit_date: Option<NaiveDate>,
    /// Marks a movement between tracked accounts; forces cash flow to zero.
    #[serde(default)]
    pub internal_flow: bool,
    pub fx_source: Option<String>,
    pub fx_timestamp: Option<DateTime<Utc>>,

    // Derived (computed once at derivation)
    pub amount_local: Decimal,
    pub amount_usd: Decimal,
    pub amount_vnd: Decimal,
    pub delta_qty: Decimal,
    pub cash_flow_local: Decimal,
    pub cash_flow_usd: Decimal,
    pub cash_flow_vnd: Decimal,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_posted(&self) -> bool {
        self.status == TransactionStatus::Posted
    }
}

/// Raw input for a ledger entry, before derivation.
///
/// Price and FX resolution happen in the caller (service layer); the draft
/// handed to `derive` already carries everything the pure computation needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub id: Option<String>,
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub asset: String,
    pub account_id: String,
    /// Resolved by the service layer from the account record; feeds the
    /// credit-card cash-flow rule. Defaults to a cash-like kind.
    #[serde(default)]
    pub account_kind: Option<AccountKind>,
    pub quantity: Decimal,
    pub price_local: Decimal,
    pub local_currency: Option<String>,
    pub fx_to_usd: Option<Decimal>,
    pub fx_to_vnd: Option<Decimal>,
    pub fee_local: Option<Decimal>,
    pub counterparty: Option<String>,
    pub tag: Option<String>,
    pub note: Option<String>,
    pub position_id: Option<String>,
    pub horizon: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
    #[serde(default)]
    pub internal_flow: bool,
    pub fx_source: Option<String>,
    pub fx_timestamp: Option<DateTime<Utc>>,
}

impl TransactionDraft {
    /// Minimal draft with required inputs; everything else defaulted.
    pub fn new(
        transaction_date: NaiveDate,
        transaction_type: TransactionType,
        asset: impl Into<String>,
        account_id: impl Into<String>,
        quantity: Decimal,
        price_local: Decimal,
    ) -> Self {
        TransactionDraft {
            id: None,
            transaction_date,
            transaction_type,
            asset: asset.into(),
            account_id: account_id.into(),
            account_kind: None,
            quantity,
            price_local,
            local_currency: None,
            fx_to_usd: None,
            fx_to_vnd: None,
            fee_local: None,
            counterparty: None,
            tag: None,
            note: None,
            position_id: None,
            horizon: None,
            entry_date: None,
            exit_date: None,
            internal_flow: false,
            fx_source: None,
            fx_timestamp: None,
        }
    }

    pub fn local_currency(&self) -> &str {
        self.local_currency.as_deref().unwrap_or(BASE_CURRENCY)
    }
}

/// Inclusive date range; the uniform query key for all reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Period { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whole days covered, inclusive of both endpoints.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Filter for ledger scans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub types: Option<Vec<TransactionType>>,
    pub assets: Option<Vec<String>>,
    pub account_ids: Option<Vec<String>>,
    pub counterparty: Option<String>,
    pub position_id: Option<String>,
    /// Void entries are excluded unless explicitly requested.
    #[serde(default)]
    pub include_void: bool,
}

impl TransactionFilter {
    pub fn for_period(period: &Period) -> Self {
        TransactionFilter {
            date_from: Some(period.start),
            date_to: Some(period.end),
            ..Default::default()
        }
    }

    pub fn up_to(as_of: NaiveDate) -> Self {
        TransactionFilter {
            date_to: Some(as_of),
            ..Default::default()
        }
    }

    /// Shared matching logic so every storage implementation filters
    /// identically.
    pub fn matches(&self, tx: &Transaction) -> bool {
        if !self.include_void && !tx.is_posted() {
            return false;
        }
        if let Some(from) = self.date_from {
            if tx.transaction_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if tx.transaction_date > to {
                return false;
            }
        }
        if let Some(types) = &self.types {
            if !types.contains(&tx.transaction_type) {
                return false;
            }
        }
        if let Some(assets) = &self.assets {
            if !assets.contains(&tx.asset) {
                return false;
            }
        }
        if let Some(accounts) = &self.account_ids {
            if !accounts.contains(&tx.account_id) {
                return false;
            }
        }
        if let Some(counterparty) = &self.counterparty {
            if tx.counterparty.as_deref() != Some(counterparty.as_str()) {
                return false;
            }
        }
        if let Some(position_id) = &self.position_id {
            if tx.position_id.as_deref() != Some(position_id.as_str()) {
                return false;
            }
        }
        true
    }
}
