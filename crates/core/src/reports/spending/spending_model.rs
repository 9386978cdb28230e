use crate::ledger::Period;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spend attributed to one tag, as positive magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSpend {
    pub tag: String,
    pub amount_usd: Decimal,
    pub amount_vnd: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySpend {
    pub date: NaiveDate,
    pub amount_usd: Decimal,
    pub amount_vnd: Decimal,
}

/// Spending over a period: expense entries whose cash flow is negative,
/// valued with each transaction's own stored FX. Credit-card accrual and
/// internal movements carry zero cash flow and never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingReport {
    pub period: Period,
    pub total_usd: Decimal,
    pub total_vnd: Decimal,
    pub by_tag: Vec<TagSpend>,
    pub by_day: Vec<DaySpend>,
}
