use crate::ledger::{derive, TransactionDraft, TransactionType};
use crate::positions::{
    closure_realized, link_realized_pnl, ClosureLink, Position,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn deposit_tx(quantity: Decimal, unit_cost: Decimal) -> crate::ledger::Transaction {
    let mut draft = TransactionDraft::new(
        date(2024, 1, 1),
        TransactionType::Stake,
        "USDT",
        "acc-1",
        quantity,
        unit_cost,
    );
    draft.id = Some("dep-1".to_string());
    draft.fx_to_vnd = Some(dec!(25000));
    derive(&draft).unwrap()
}

fn link(qty: Decimal, value: Decimal, unit_cost: Decimal, stamped: bool) -> ClosureLink {
    ClosureLink {
        id: uuid::Uuid::new_v4().to_string(),
        from_tx_id: "dep-1".to_string(),
        to_tx_id: uuid::Uuid::new_v4().to_string(),
        position_id: "pos-1".to_string(),
        link_type: "stake_unstake".to_string(),
        withdrawal_qty: qty,
        withdrawal_value: value,
        deposit_unit_cost: unit_cost,
        exit_date: stamped.then(|| date(2024, 6, 1)),
        created_at: Utc::now(),
    }
}

#[test]
fn test_stamped_link_uses_exact_basis() {
    let deposit = deposit_tx(dec!(1000), dec!(1));
    let pnl = link_realized_pnl(&link(dec!(300), dec!(330), dec!(1), true), &deposit);
    assert_eq!(pnl, dec!(30));
}

#[test]
fn test_unstamped_link_uses_proportional_estimate() {
    let deposit = deposit_tx(dec!(1000), dec!(1));
    // (300/1000) * (330 - 1*300) = 9
    let pnl = link_realized_pnl(&link(dec!(300), dec!(330), dec!(1), false), &deposit);
    assert_eq!(pnl, dec!(9));
}

#[test]
fn test_closure_realized_sums_links() {
    let deposit = deposit_tx(dec!(1000), dec!(1));
    let links = vec![
        link(dec!(300), dec!(330), dec!(1), true),
        link(dec!(400), dec!(480), dec!(1), true),
        link(dec!(300), dec!(270), dec!(1), true),
    ];
    let (pnl, basis) = closure_realized(&links, &deposit, None);
    assert_eq!(pnl, dec!(80));
    assert_eq!(basis, dec!(1000));
}

#[test]
fn test_over_withdrawal_uses_total_deposited_cost() {
    let deposit = deposit_tx(dec!(500), dec!(2));
    let mut position = Position::new("USDT", "acc-1");
    position.apply_deposit(dec!(500), dec!(2));

    // 600 withdrawn against 500 deposited.
    let links = vec![link(dec!(600), dec!(1500), dec!(2), true)];
    let (pnl, basis) = closure_realized(&links, &deposit, Some(&position));
    assert_eq!(pnl, dec!(300));
    // Not the clipped 600 * 2 = 1200.
    assert_eq!(basis, dec!(1000));
}

#[test]
fn test_annualized_roi_omitted_when_zero_or_unknown() {
    use crate::positions::realization::{annualized_roi, roi_percent};

    assert_eq!(annualized_roi(Decimal::ZERO, Some(100)), None);
    assert_eq!(annualized_roi(dec!(8), None), None);
    assert_eq!(annualized_roi(dec!(8), Some(0)), None);
    assert_eq!(
        annualized_roi(dec!(10), Some(365)),
        Some(dec!(10))
    );

    assert_eq!(roi_percent(dec!(80), dec!(1000)), dec!(8));
    assert_eq!(roi_percent(dec!(80), Decimal::ZERO), Decimal::ZERO);
}
