use crate::ledger::{Period, TransactionType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bucket total in both reporting currencies, converted at the single
/// period-end rate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTotals {
    pub usd: Decimal,
    pub vnd: Decimal,
}

/// Inflow/outflow/net for one transaction type over the period, in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeFlow {
    pub transaction_type: TransactionType,
    pub inflow_usd: Decimal,
    pub outflow_usd: Decimal,
    pub net_usd: Decimal,
}

/// Cash flow over a period, bucketed into operating and financing.
/// Investing flows surface only in the by-type breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowReport {
    pub period: Period,
    pub operating: FlowTotals,
    pub financing: FlowTotals,
    /// Operating plus financing.
    pub net: FlowTotals,
    pub by_type: Vec<TypeFlow>,
}
