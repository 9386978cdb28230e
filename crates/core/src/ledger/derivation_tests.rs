use crate::accounts::AccountKind;
use crate::errors::{Error, ValidationError};
use crate::ledger::{derive, TransactionDraft, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn usd_draft(
    transaction_type: TransactionType,
    quantity: Decimal,
    price: Decimal,
) -> TransactionDraft {
    let mut draft = TransactionDraft::new(
        date(2024, 3, 15),
        transaction_type,
        "BTC",
        "acc-1",
        quantity,
        price,
    );
    draft.fx_to_vnd = Some(dec!(25000));
    draft
}

#[test]
fn test_buy_signs() {
    let mut draft = usd_draft(TransactionType::Buy, dec!(2), dec!(100));
    draft.fee_local = Some(dec!(1.5));
    let tx = derive(&draft).unwrap();

    assert_eq!(tx.amount_local, dec!(200.00));
    assert_eq!(tx.amount_usd, dec!(200.00));
    assert_eq!(tx.amount_vnd, dec!(5000000));
    assert_eq!(tx.delta_qty, dec!(2));
    // Outflow pays amount plus fee.
    assert_eq!(tx.cash_flow_usd, dec!(-201.50));
}

#[test]
fn test_sell_signs() {
    let mut draft = usd_draft(TransactionType::Sell, dec!(3), dec!(50));
    draft.fee_local = Some(dec!(2));
    let tx = derive(&draft).unwrap();

    assert_eq!(tx.delta_qty, dec!(-3));
    // Inflow receives amount minus fee.
    assert_eq!(tx.cash_flow_usd, dec!(148.00));
}

#[test]
fn test_credit_card_expense_zero_cash_flow_but_negative_delta() {
    let mut draft = usd_draft(TransactionType::Expense, dec!(1), dec!(75));
    draft.account_kind = Some(AccountKind::CreditCard);
    let tx = derive(&draft).unwrap();

    assert_eq!(tx.cash_flow_local, Decimal::ZERO);
    assert_eq!(tx.cash_flow_usd, Decimal::ZERO);
    assert_eq!(tx.cash_flow_vnd, Decimal::ZERO);
    assert_eq!(tx.delta_qty, dec!(-1));
    assert_eq!(tx.amount_usd, dec!(75.00));
}

#[test]
fn test_expense_on_bank_account_moves_cash() {
    let mut draft = usd_draft(TransactionType::Expense, dec!(1), dec!(75));
    draft.account_kind = Some(AccountKind::Bank);
    let tx = derive(&draft).unwrap();
    assert_eq!(tx.cash_flow_usd, dec!(-75.00));
}

#[test]
fn test_internal_flow_forces_zero_cash_flow() {
    let mut draft = usd_draft(TransactionType::TransferOut, dec!(500), dec!(1));
    draft.internal_flow = true;
    let tx = derive(&draft).unwrap();

    assert_eq!(tx.cash_flow_usd, Decimal::ZERO);
    assert_eq!(tx.delta_qty, dec!(-500));
}

#[test]
fn test_derivation_is_deterministic() {
    let mut draft = usd_draft(TransactionType::Buy, dec!(1.23456789), dec!(42.42));
    draft.fee_local = Some(dec!(0.333));
    draft.id = Some("tx-fixed".to_string());

    let a = derive(&draft).unwrap();
    let b = derive(&draft).unwrap();

    assert_eq!(a.amount_local, b.amount_local);
    assert_eq!(a.amount_usd, b.amount_usd);
    assert_eq!(a.amount_vnd, b.amount_vnd);
    assert_eq!(a.delta_qty, b.delta_qty);
    assert_eq!(a.cash_flow_local, b.cash_flow_local);
    assert_eq!(a.cash_flow_usd, b.cash_flow_usd);
    assert_eq!(a.cash_flow_vnd, b.cash_flow_vnd);
}

#[test]
fn test_vnd_amounts_round_to_whole_units() {
    let mut draft = TransactionDraft::new(
        date(2024, 3, 15),
        TransactionType::Expense,
        "VND",
        "acc-1",
        dec!(1),
        dec!(10500.5),
    );
    draft.local_currency = Some("VND".to_string());
    draft.fx_to_usd = Some(dec!(0.00004));
    let tx = derive(&draft).unwrap();

    // 10500.5 rounds to even: 10500.
    assert_eq!(tx.amount_local, dec!(10500));
    assert_eq!(tx.amount_vnd, dec!(10500));
    assert_eq!(tx.amount_usd, dec!(0.42));
}

#[test]
fn test_usd_amounts_use_bankers_rounding() {
    // 1.005 * 4.5 = 4.5225 -> 4.52; half-even at the second decimal.
    let mut draft = usd_draft(TransactionType::Buy, dec!(4.5), dec!(1.005));
    draft.fx_to_vnd = Some(dec!(25000));
    let tx = derive(&draft).unwrap();
    assert_eq!(tx.amount_usd, dec!(4.52));
}

#[test]
fn test_valuation_is_neutral() {
    let tx = derive(&usd_draft(TransactionType::Valuation, dec!(10), dec!(99))).unwrap();
    assert_eq!(tx.delta_qty, Decimal::ZERO);
    assert_eq!(tx.cash_flow_usd, Decimal::ZERO);
    // The mark itself is still valued.
    assert_eq!(tx.amount_usd, dec!(990.00));
}

#[test]
fn test_borrow_increases_quantity_and_cash() {
    let tx = derive(&usd_draft(TransactionType::Borrow, dec!(1000), dec!(1))).unwrap();
    assert_eq!(tx.delta_qty, dec!(1000));
    assert_eq!(tx.cash_flow_usd, dec!(1000.00));

    let repay = derive(&usd_draft(TransactionType::RepayBorrow, dec!(400), dec!(1))).unwrap();
    assert_eq!(repay.delta_qty, dec!(-400));
    assert_eq!(repay.cash_flow_usd, dec!(-400.00));
}

#[test]
fn test_negative_quantity_rejected() {
    let draft = usd_draft(TransactionType::Buy, dec!(-1), dec!(100));
    let err = derive(&draft).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::NegativeAmount { .. })
    ));
}

#[test]
fn test_negative_price_rejected() {
    let draft = usd_draft(TransactionType::Buy, dec!(1), dec!(-100));
    assert!(derive(&draft).is_err());
}

#[test]
fn test_missing_fx_rate_rejected_for_foreign_currency() {
    let mut draft = TransactionDraft::new(
        date(2024, 3, 15),
        TransactionType::Expense,
        "EUR",
        "acc-1",
        dec!(1),
        dec!(20),
    );
    draft.local_currency = Some("EUR".to_string());
    let err = derive(&draft).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::MissingField(_))
    ));
}

#[test]
fn test_unknown_type_string_rejected() {
    let err = TransactionType::from_str("gift").unwrap_err();
    assert!(matches!(err, ValidationError::UnknownTransactionType(_)));
    assert_eq!(
        TransactionType::from_str("repay_borrow").unwrap(),
        TransactionType::RepayBorrow
    );
}

#[test]
fn test_fx_provenance_carried_through() {
    let mut draft = usd_draft(TransactionType::Buy, dec!(1), dec!(10));
    draft.fx_source = Some("vietcombank".to_string());
    let tx = derive(&draft).unwrap();
    assert_eq!(tx.fx_source.as_deref(), Some("vietcombank"));
}
