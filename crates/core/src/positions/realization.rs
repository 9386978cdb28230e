//! Deferred P&L realization.
//!
//! Realized P&L is never computed incrementally per withdrawal. This read
//! path sums, over the closure links of deposits stamped closed inside the
//! query period, the difference between linked withdrawal value and the
//! basis of the linked quantity. While a deposit carries no exit date its
//! reported P&L and ROI are exactly zero, even when partial withdrawals
//! happened at a profit or loss.

use super::positions_model::{ClosureLink, Position};
use crate::ledger::Transaction;
use rust_decimal::Decimal;

/// Aggregated realized P&L for a period.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedPnl {
    pub pnl_usd: Decimal,
    /// Cost basis of the closed quantity, the ROI denominator.
    pub cost_basis_usd: Decimal,
    pub roi_pct: Decimal,
    /// Only present when ROI is non-zero and the holding duration is known.
    pub annualized_roi_pct: Option<Decimal>,
}

/// Realized P&L contributed by one closure link.
///
/// Links stamped with an exit date use the exact snapshot basis. Links
/// without one (legacy rows) fall back to a proportional estimate against
/// the deposit's own quantity.
pub fn link_realized_pnl(link: &ClosureLink, deposit: &Transaction) -> Decimal {
    match link.exit_date {
        Some(_) => link.withdrawal_value - link.withdrawal_qty * link.deposit_unit_cost,
        None => {
            if deposit.quantity.is_zero() {
                return Decimal::ZERO;
            }
            (link.withdrawal_qty / deposit.quantity)
                * (link.withdrawal_value - link.deposit_unit_cost * link.withdrawal_qty)
        }
    }
}

/// P&L and cost basis recognized for one closed deposit.
///
/// The basis is the linked quantity priced at the snapshotted unit cost;
/// when withdrawals exceed the deposited quantity (blackbox policy), the
/// total deposited cost is used instead of a clipped quantity.
pub fn closure_realized(
    links: &[ClosureLink],
    deposit: &Transaction,
    position: Option<&Position>,
) -> (Decimal, Decimal) {
    let pnl: Decimal = links
        .iter()
        .map(|link| link_realized_pnl(link, deposit))
        .sum();

    let closed_qty: Decimal = links.iter().map(|link| link.withdrawal_qty).sum();
    let linked_basis: Decimal = links
        .iter()
        .map(|link| link.withdrawal_qty * link.deposit_unit_cost)
        .sum();

    let cost_basis = match position {
        Some(pos) if closed_qty > pos.deposit_qty => pos.deposit_cost,
        _ => linked_basis,
    };

    (pnl, cost_basis)
}

/// ROI over a cost basis, as a percentage.
pub fn roi_percent(pnl: Decimal, cost_basis: Decimal) -> Decimal {
    if cost_basis.is_zero() {
        return Decimal::ZERO;
    }
    pnl / cost_basis * Decimal::ONE_HUNDRED
}

/// Linear annualization over the holding duration in days. `None` when the
/// ROI is zero or the duration is unknown or non-positive.
pub fn annualized_roi(roi_pct: Decimal, held_days: Option<i64>) -> Option<Decimal> {
    if roi_pct.is_zero() {
        return None;
    }
    match held_days {
        Some(days) if days > 0 => Some(roi_pct * Decimal::from(365) / Decimal::from(days)),
        _ => None,
    }
}
