use super::spending_model::{DaySpend, SpendingReport, TagSpend};
use crate::errors::Result;
use crate::ledger::{is_spend_like, LedgerRepositoryTrait, Period, TransactionFilter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

const UNTAGGED: &str = "untagged";

/// Spending report over a period.
///
/// Spending is recognized when cash actually leaves an external-facing
/// account: only spend-like entries with negative cash flow count. A
/// credit-card expense accrues a liability but moves no cash, so it shows
/// up in holdings and P&L, not here.
pub struct SpendingService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
}

impl SpendingService {
    pub fn new(ledger_repository: Arc<dyn LedgerRepositoryTrait>) -> Self {
        SpendingService { ledger_repository }
    }

    pub fn get_spending(&self, period: &Period) -> Result<SpendingReport> {
        let transactions = self
            .ledger_repository
            .list_transactions(&TransactionFilter::for_period(period))?;

        let mut total_usd = Decimal::ZERO;
        let mut total_vnd = Decimal::ZERO;
        let mut by_tag: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        let mut by_day: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();

        for tx in &transactions {
            if !is_spend_like(tx.transaction_type) || !tx.cash_flow_usd.is_sign_negative() {
                continue;
            }
            // Magnitudes, at the transaction's own stored FX.
            let usd = -tx.cash_flow_usd;
            let vnd = -tx.cash_flow_vnd;
            total_usd += usd;
            total_vnd += vnd;

            let tag = tx.tag.clone().unwrap_or_else(|| UNTAGGED.to_string());
            let entry = by_tag.entry(tag).or_default();
            entry.0 += usd;
            entry.1 += vnd;

            let entry = by_day.entry(tx.transaction_date).or_default();
            entry.0 += usd;
            entry.1 += vnd;
        }

        Ok(SpendingReport {
            period: *period,
            total_usd,
            total_vnd,
            by_tag: by_tag
                .into_iter()
                .map(|(tag, (amount_usd, amount_vnd))| TagSpend {
                    tag,
                    amount_usd,
                    amount_vnd,
                })
                .collect(),
            by_day: by_day
                .into_iter()
                .map(|(date, (amount_usd, amount_vnd))| DaySpend {
                    date,
                    amount_usd,
                    amount_vnd,
                })
                .collect(),
        })
    }
}
