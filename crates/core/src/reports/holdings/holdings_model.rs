use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One (asset, account) balance valued as of the report date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub asset: String,
    pub account_id: String,
    pub quantity: Decimal,
    /// Unit price used for valuation; oracle quote when available,
    /// otherwise the most recent transaction's own USD unit price.
    pub price_usd: Decimal,
    pub value_usd: Decimal,
    /// Share of the report's total value, as a percentage.
    pub weight_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsReport {
    pub as_of: NaiveDate,
    pub holdings: Vec<Holding>,
    pub total_value_usd: Decimal,
}

/// A regrouping of the holdings report along one axis (asset or account).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingGroup {
    pub key: String,
    pub value_usd: Decimal,
    pub weight_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsBreakdown {
    pub as_of: NaiveDate,
    pub groups: Vec<HoldingGroup>,
    pub total_value_usd: Decimal,
}
