use super::cashflow_model::{CashFlowReport, FlowTotals, TypeFlow};
use crate::constants::{BASE_CURRENCY, REPORTING_CURRENCY};
use crate::errors::Result;
use crate::fx::{round_currency, FxServiceTrait};
use crate::ledger::{
    is_financing, is_investing, LedgerRepositoryTrait, Period, TransactionFilter, TransactionType,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Cash flow report over a period.
///
/// Flows are summed in their local currency first and converted with the
/// single period-end rate (latest rate dated on or before the period end).
/// A transaction's own stored FX never enters this report, and rates dated
/// after the period end cannot affect it.
pub struct CashFlowService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
}

/// Local-currency sums keyed by currency code.
type CurrencySums = HashMap<String, Decimal>;

impl CashFlowService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
    ) -> Self {
        CashFlowService {
            ledger_repository,
            fx_service,
        }
    }

    pub fn get_cash_flow(&self, period: &Period) -> Result<CashFlowReport> {
        let transactions = self
            .ledger_repository
            .list_transactions(&TransactionFilter::for_period(period))?;

        let mut operating = CurrencySums::new();
        let mut financing = CurrencySums::new();
        let mut inflows: HashMap<TransactionType, CurrencySums> = HashMap::new();
        let mut outflows: HashMap<TransactionType, CurrencySums> = HashMap::new();

        for tx in &transactions {
            let flow = tx.cash_flow_local;
            if flow.is_zero() {
                continue;
            }

            let side = if flow.is_sign_positive() {
                inflows.entry(tx.transaction_type).or_default()
            } else {
                outflows.entry(tx.transaction_type).or_default()
            };
            *side.entry(tx.local_currency.clone()).or_default() += flow;

            if is_investing(tx.transaction_type) {
                continue;
            }
            let bucket = if is_financing(tx.transaction_type) {
                &mut financing
            } else {
                &mut operating
            };
            *bucket.entry(tx.local_currency.clone()).or_default() += flow;
        }

        let operating = self.totals(&operating, period.end)?;
        let financing = self.totals(&financing, period.end)?;
        let net = FlowTotals {
            usd: operating.usd + financing.usd,
            vnd: operating.vnd + financing.vnd,
        };

        let mut types: Vec<TransactionType> = inflows
            .keys()
            .chain(outflows.keys())
            .copied()
            .collect();
        types.sort();
        types.dedup();

        let mut by_type = Vec::with_capacity(types.len());
        for transaction_type in types {
            let inflow_usd = match inflows.get(&transaction_type) {
                Some(sums) => self.to_usd(sums, period.end)?,
                None => Decimal::ZERO,
            };
            let outflow_usd = match outflows.get(&transaction_type) {
                Some(sums) => self.to_usd(sums, period.end)?,
                None => Decimal::ZERO,
            };
            by_type.push(TypeFlow {
                transaction_type,
                inflow_usd,
                outflow_usd,
                net_usd: inflow_usd + outflow_usd,
            });
        }

        Ok(CashFlowReport {
            period: *period,
            operating,
            financing,
            net,
            by_type,
        })
    }

    /// Converts per-currency sums to a USD total at the period-end rate.
    fn to_usd(&self, sums: &CurrencySums, as_of: NaiveDate) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for (currency, amount) in sums {
            if amount.is_zero() {
                continue;
            }
            total += self
                .fx_service
                .convert_as_of(*amount, currency, BASE_CURRENCY, as_of)?;
        }
        Ok(round_currency(total, BASE_CURRENCY))
    }

    fn totals(&self, sums: &CurrencySums, as_of: NaiveDate) -> Result<FlowTotals> {
        let usd = self.to_usd(sums, as_of)?;
        let vnd = if usd.is_zero() {
            Decimal::ZERO
        } else {
            let converted = self
                .fx_service
                .convert_as_of(usd, BASE_CURRENCY, REPORTING_CURRENCY, as_of)?;
            round_currency(converted, REPORTING_CURRENCY)
        };
        Ok(FlowTotals { usd, vnd })
    }
}
