use super::pnl_model::PnlReport;
use crate::constants::{BASE_CURRENCY, QUANTITY_THRESHOLD, REPORTING_CURRENCY};
use crate::errors::Result;
use crate::fx::{round_currency, FxServiceTrait};
use crate::ledger::Period;
use crate::positions::{PositionServiceTrait, PositionStatusFilter};
use crate::quotes::PriceOracleTrait;
use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

/// P&L report service.
///
/// The realized component is the deferred read path: only closures whose
/// deposit was stamped with an exit date inside the period contribute.
/// Open positions never contribute realized P&L, however their withdrawals
/// went; they show up only as unrealized movement against the period-end
/// price.
pub struct PnlService {
    position_service: Arc<dyn PositionServiceTrait>,
    price_oracle: Arc<dyn PriceOracleTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
}

impl PnlService {
    pub fn new(
        position_service: Arc<dyn PositionServiceTrait>,
        price_oracle: Arc<dyn PriceOracleTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
    ) -> Self {
        PnlService {
            position_service,
            price_oracle,
            fx_service,
        }
    }

    pub fn get_pnl(&self, period: &Period) -> Result<PnlReport> {
        let realized = self.position_service.realized_pnl(period)?;
        let unrealized_usd = self.unrealized(period)?;
        let total_usd = realized.pnl_usd + unrealized_usd;

        let to_vnd = |usd: Decimal| -> Result<Decimal> {
            if usd.is_zero() {
                return Ok(Decimal::ZERO);
            }
            let rate = self
                .fx_service
                .rate_as_of(BASE_CURRENCY, REPORTING_CURRENCY, period.end)?;
            Ok(round_currency(usd * rate, REPORTING_CURRENCY))
        };

        Ok(PnlReport {
            period: *period,
            realized_usd: realized.pnl_usd,
            realized_vnd: to_vnd(realized.pnl_usd)?,
            unrealized_usd,
            unrealized_vnd: to_vnd(unrealized_usd)?,
            total_usd,
            total_vnd: to_vnd(total_usd)?,
            cost_basis_usd: realized.cost_basis_usd,
            roi_pct: realized.roi_pct,
            annualized_roi_pct: realized.annualized_roi_pct,
        })
    }

    /// Open positions marked to the period-end price. Positions without a
    /// quote stay at cost and contribute nothing.
    fn unrealized(&self, period: &Period) -> Result<Decimal> {
        let threshold = Decimal::from_str(QUANTITY_THRESHOLD).unwrap_or(Decimal::ZERO);
        let mut total = Decimal::ZERO;

        for position in self
            .position_service
            .list_positions(PositionStatusFilter::Open)?
        {
            let remaining = position.remaining_qty();
            if remaining.abs() < threshold {
                continue;
            }
            let price = match self
                .price_oracle
                .latest_price(&position.asset, BASE_CURRENCY, period.end)?
            {
                Some(quote) => quote.price,
                None => {
                    debug!(
                        "No period-end quote for {}, holding at cost",
                        position.asset
                    );
                    continue;
                }
            };
            total += round_currency(
                remaining * (price - position.deposit_unit_cost),
                BASE_CURRENCY,
            );
        }

        Ok(total)
    }
}
