use super::holdings_model::{Holding, HoldingGroup, HoldingsBreakdown, HoldingsReport};
use crate::constants::{BASE_CURRENCY, QUANTITY_THRESHOLD};
use crate::errors::Result;
use crate::fx::round_currency;
use crate::ledger::{LedgerRepositoryTrait, Transaction, TransactionFilter};
use crate::quotes::PriceOracleTrait;
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// Holdings report: sum of signed quantity deltas up to the report date,
/// valued at the latest known price.
///
/// The three groupings (flat, by asset, by account) are views over the same
/// scan and reconcile to the identical USD total by construction.
pub struct HoldingsService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    price_oracle: Arc<dyn PriceOracleTrait>,
}

impl HoldingsService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        price_oracle: Arc<dyn PriceOracleTrait>,
    ) -> Self {
        HoldingsService {
            ledger_repository,
            price_oracle,
        }
    }

    pub fn get_holdings(&self, as_of: NaiveDate) -> Result<HoldingsReport> {
        let transactions = self
            .ledger_repository
            .list_transactions(&TransactionFilter::up_to(as_of))?;

        let threshold = Decimal::from_str(QUANTITY_THRESHOLD).unwrap_or(Decimal::ZERO);

        let mut balances: HashMap<(String, String), Decimal> = HashMap::new();
        let mut last_tx_price: HashMap<String, (NaiveDate, Decimal)> = HashMap::new();
        for tx in &transactions {
            *balances
                .entry((tx.asset.clone(), tx.account_id.clone()))
                .or_default() += tx.delta_qty;
            record_last_price(&mut last_tx_price, tx);
        }

        let mut holdings = Vec::new();
        for ((asset, account_id), quantity) in balances {
            if quantity.abs() < threshold {
                continue;
            }
            let price_usd = self.resolve_price(&asset, as_of, &last_tx_price);
            let value_usd = round_currency(quantity * price_usd, BASE_CURRENCY);
            holdings.push(Holding {
                asset,
                account_id,
                quantity,
                price_usd,
                value_usd,
                weight_pct: Decimal::ZERO,
            });
        }

        let total_value_usd: Decimal = holdings.iter().map(|h| h.value_usd).sum();
        if !total_value_usd.is_zero() {
            for holding in &mut holdings {
                holding.weight_pct = holding.value_usd / total_value_usd * Decimal::ONE_HUNDRED;
            }
        }
        holdings.sort_by(|a, b| {
            a.asset
                .cmp(&b.asset)
                .then_with(|| a.account_id.cmp(&b.account_id))
        });

        Ok(HoldingsReport {
            as_of,
            holdings,
            total_value_usd,
        })
    }

    pub fn get_holdings_by_asset(&self, as_of: NaiveDate) -> Result<HoldingsBreakdown> {
        let report = self.get_holdings(as_of)?;
        Ok(regroup(report, |h| h.asset.clone()))
    }

    pub fn get_holdings_by_account(&self, as_of: NaiveDate) -> Result<HoldingsBreakdown> {
        let report = self.get_holdings(as_of)?;
        Ok(regroup(report, |h| h.account_id.clone()))
    }

    fn resolve_price(
        &self,
        asset: &str,
        as_of: NaiveDate,
        last_tx_price: &HashMap<String, (NaiveDate, Decimal)>,
    ) -> Decimal {
        match self.price_oracle.latest_price(asset, BASE_CURRENCY, as_of) {
            Ok(Some(quote)) => return quote.price,
            Ok(None) => {}
            Err(e) => warn!("Price lookup failed for {}: {}", asset, e),
        }
        match last_tx_price.get(asset) {
            Some((_, price)) => *price,
            None => {
                warn!("No price available for {}, valuing at zero", asset);
                Decimal::ZERO
            }
        }
    }
}

fn record_last_price(last: &mut HashMap<String, (NaiveDate, Decimal)>, tx: &Transaction) {
    if tx.price_local.is_zero() {
        return;
    }
    let price_usd = tx.price_local * tx.fx_to_usd;
    match last.get(&tx.asset) {
        Some((date, _)) if *date > tx.transaction_date => {}
        _ => {
            last.insert(tx.asset.clone(), (tx.transaction_date, price_usd));
        }
    }
}

fn regroup(report: HoldingsReport, key: impl Fn(&Holding) -> String) -> HoldingsBreakdown {
    let mut values: HashMap<String, Decimal> = HashMap::new();
    for holding in &report.holdings {
        *values.entry(key(holding)).or_default() += holding.value_usd;
    }

    let total = report.total_value_usd;
    let mut groups: Vec<HoldingGroup> = values
        .into_iter()
        .map(|(key, value_usd)| HoldingGroup {
            key,
            value_usd,
            weight_pct: if total.is_zero() {
                Decimal::ZERO
            } else {
                value_usd / total * Decimal::ONE_HUNDRED
            },
        })
        .collect();
    groups.sort_by(|a, b| a.key.cmp(&b.key));

    HoldingsBreakdown {
        as_of: report.as_of,
        groups,
        total_value_usd: total,
    }
}
