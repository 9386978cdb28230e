use crate::ledger::Period;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// P&L over a period: deferred realized gains from closures stamped inside
/// the period, plus unrealized movement on still-open positions priced at
/// the period end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlReport {
    pub period: Period,
    pub realized_usd: Decimal,
    pub realized_vnd: Decimal,
    pub unrealized_usd: Decimal,
    pub unrealized_vnd: Decimal,
    pub total_usd: Decimal,
    pub total_vnd: Decimal,
    /// Cost basis of the quantity closed in the period.
    pub cost_basis_usd: Decimal,
    pub roi_pct: Decimal,
    /// Omitted, not zero, when ROI is zero or the duration is unknown.
    pub annualized_roi_pct: Option<Decimal>,
}
