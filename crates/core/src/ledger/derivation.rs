//! Transaction derivation.
//!
//! Turns a raw draft into a fully derived, storable ledger record. The
//! derived money fields are a pure function of the draft: price and FX
//! resolution happen in the caller, and this step performs no lookups of
//! its own. Identifiers and audit stamps are the only generated values.

use super::ledger_model::{
    CashFlowDirection, QuantityDirection, Transaction, TransactionDraft, TransactionStatus,
};
use crate::accounts::AccountKind;
use crate::constants::{BASE_CURRENCY, REPORTING_CURRENCY};
use crate::errors::{Result, ValidationError};
use crate::fx::round_currency;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

fn reject_negative(field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() {
        return Err(ValidationError::NegativeAmount {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Derives a storable transaction from a draft.
///
/// Rejects negative quantity, price, or fee before anything else. Amounts
/// in USD and VND are the local amount taken through the draft's own stored
/// FX rates, rounded to currency precision with banker's rounding.
pub fn derive(draft: &TransactionDraft) -> Result<Transaction> {
    reject_negative("quantity", draft.quantity)?;
    reject_negative("priceLocal", draft.price_local)?;
    let fee_local = draft.fee_local.unwrap_or(Decimal::ZERO);
    reject_negative("feeLocal", fee_local)?;

    let local_currency = draft.local_currency().to_string();

    let fx_to_usd = match draft.fx_to_usd {
        Some(rate) => rate,
        None if local_currency == BASE_CURRENCY => Decimal::ONE,
        None => return Err(ValidationError::MissingField("fxToUsd".to_string()).into()),
    };
    let fx_to_vnd = match draft.fx_to_vnd {
        Some(rate) => rate,
        None if local_currency == REPORTING_CURRENCY => Decimal::ONE,
        None => return Err(ValidationError::MissingField("fxToVnd".to_string()).into()),
    };
    reject_negative("fxToUsd", fx_to_usd)?;
    reject_negative("fxToVnd", fx_to_vnd)?;

    let amount_local = round_currency(draft.quantity * draft.price_local, &local_currency);
    let amount_usd = round_currency(amount_local * fx_to_usd, BASE_CURRENCY);
    let amount_vnd = round_currency(amount_local * fx_to_vnd, REPORTING_CURRENCY);
    let fee_usd = round_currency(fee_local * fx_to_usd, BASE_CURRENCY);
    let fee_vnd = round_currency(fee_local * fx_to_vnd, REPORTING_CURRENCY);

    let delta_qty = match draft.transaction_type.quantity_direction() {
        QuantityDirection::Increase => draft.quantity,
        QuantityDirection::Decrease => -draft.quantity,
        QuantityDirection::Neutral => Decimal::ZERO,
    };

    let account_kind = draft.account_kind.unwrap_or_default();
    let (cash_flow_local, cash_flow_usd, cash_flow_vnd) = cash_flow(
        draft,
        account_kind,
        amount_local,
        amount_usd,
        amount_vnd,
        fee_local,
        fee_usd,
        fee_vnd,
    );

    let now = Utc::now();
    Ok(Transaction {
        id: draft
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        transaction_date: draft.transaction_date,
        transaction_type: draft.transaction_type,
        status: TransactionStatus::Posted,
        asset: draft.asset.clone(),
        account_id: draft.account_id.clone(),
        quantity: draft.quantity,
        price_local: draft.price_local,
        local_currency,
        fx_to_usd,
        fx_to_vnd,
        fee_local,
        fee_usd,
        fee_vnd,
        counterparty: draft.counterparty.clone(),
        tag: draft.tag.clone(),
        note: draft.note.clone(),
        position_id: draft.position_id.clone(),
        horizon: draft.horizon.clone(),
        entry_date: draft.entry_date,
        exit_date: draft.exit_date,
        internal_flow: draft.internal_flow,
        fx_source: draft.fx_source.clone(),
        fx_timestamp: draft.fx_timestamp,
        amount_local,
        amount_usd,
        amount_vnd,
        delta_qty,
        cash_flow_local,
        cash_flow_usd,
        cash_flow_vnd,
        created_at: now,
        updated_at: now,
    })
}

/// Signed external cash movement in all three currencies.
///
/// Forced to zero for internal flows and for expenses on credit-card
/// accounts (the liability accrues; cash leaves at repayment). The fee
/// always drags cash in the flow's direction: outflows pay amount plus fee,
/// inflows receive amount minus fee.
#[allow(clippy::too_many_arguments)]
fn cash_flow(
    draft: &TransactionDraft,
    account_kind: AccountKind,
    amount_local: Decimal,
    amount_usd: Decimal,
    amount_vnd: Decimal,
    fee_local: Decimal,
    fee_usd: Decimal,
    fee_vnd: Decimal,
) -> (Decimal, Decimal, Decimal) {
    use crate::ledger::TransactionType;

    if draft.internal_flow {
        return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    }
    if account_kind.is_credit_card() && draft.transaction_type == TransactionType::Expense {
        return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    }

    match draft.transaction_type.cash_flow_direction() {
        CashFlowDirection::Inflow => (
            amount_local - fee_local,
            amount_usd - fee_usd,
            amount_vnd - fee_vnd,
        ),
        CashFlowDirection::Outflow => (
            -(amount_local + fee_local),
            -(amount_usd + fee_usd),
            -(amount_vnd + fee_vnd),
        ),
        CashFlowDirection::Neutral => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
    }
}
