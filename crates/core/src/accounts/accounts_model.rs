//! Account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of account - determines how cash flow is derived for entries
/// booked against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    #[default]
    Bank,
    Exchange,
    Wallet,
    Broker,
    /// Liability account. Expenses booked here accrue the liability without
    /// moving external cash; only the later repayment does.
    CreditCard,
    Loan,
}

impl AccountKind {
    pub fn is_credit_card(&self) -> bool {
        matches!(self, AccountKind::CreditCard)
    }
}

/// Domain model representing an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    /// Default local currency for entries booked against this account.
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub kind: AccountKind,
    pub currency: Option<String>,
}
