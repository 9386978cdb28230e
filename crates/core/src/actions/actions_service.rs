use super::actions_model::{
    ActionRequest, ActionResponse, DepositParams, InitBalanceParams, InternalTransferParams,
    RepayBorrowParams, WithdrawParams,
};
use crate::constants::BASE_CURRENCY;
use crate::errors::{Result, ValidationError};
use crate::ledger::{LedgerServiceTrait, TransactionDraft, TransactionType};
use crate::positions::{DepositRequest, PositionServiceTrait, WithdrawRequest};
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Dispatches protocol actions to the ledger and position services.
///
/// Parameter validation happens before any write; an invalid request never
/// leaves a partial trail.
pub struct ActionService {
    ledger_service: Arc<dyn LedgerServiceTrait>,
    position_service: Arc<dyn PositionServiceTrait>,
}

impl ActionService {
    pub fn new(
        ledger_service: Arc<dyn LedgerServiceTrait>,
        position_service: Arc<dyn PositionServiceTrait>,
    ) -> Self {
        ActionService {
            ledger_service,
            position_service,
        }
    }

    pub async fn dispatch(&self, request: ActionRequest) -> Result<ActionResponse> {
        match request {
            ActionRequest::Stake(params) => self.deposit(params, TransactionType::Stake).await,
            ActionRequest::Deposit(params) => self.deposit(params, TransactionType::Deposit).await,
            ActionRequest::Unstake(params) => self.unstake(params).await,
            ActionRequest::Withdraw(params) => self.withdraw(params).await,
            ActionRequest::RepayBorrow(params) => self.repay_borrow(params).await,
            ActionRequest::InternalTransfer(params) => self.internal_transfer(params).await,
            ActionRequest::InitBalance(params) => self.init_balance(params).await,
        }
    }

    async fn deposit(
        &self,
        params: DepositParams,
        transaction_type: TransactionType,
    ) -> Result<ActionResponse> {
        require_positive("quantity", params.quantity)?;
        if params.position.is_none() && params.name.is_none() {
            return Err(ValidationError::MissingField("position or name".to_string()).into());
        }

        let (_, transaction) = self
            .position_service
            .deposit(DepositRequest {
                position_ref: params.position,
                name: params.name,
                asset: params.asset,
                account_id: params.account_id,
                quantity: params.quantity,
                unit_cost_usd: params.unit_cost_usd,
                date: params.date,
                transaction_type,
                horizon: params.horizon,
                is_vault: params.is_vault,
                vault_name: params.vault_name,
            })
            .await?;

        Ok(ActionResponse {
            transactions: vec![transaction],
        })
    }

    /// Unstake emits the withdrawal plus an internal transfer-in of the
    /// proceeds, so the report layer sees the asset leave the position
    /// without double counting external cash.
    async fn unstake(&self, params: WithdrawParams) -> Result<ActionResponse> {
        validate_withdraw(&params)?;
        let to_account_id = params.to_account_id.clone();

        let outcome = self
            .position_service
            .withdraw(to_withdraw_request(params, TransactionType::Unstake))
            .await?;

        let mut proceeds = TransactionDraft::new(
            outcome.transaction.transaction_date,
            TransactionType::TransferIn,
            BASE_CURRENCY,
            to_account_id.unwrap_or_else(|| outcome.transaction.account_id.clone()),
            outcome.link.withdrawal_value,
            Decimal::ONE,
        );
        proceeds.internal_flow = true;
        proceeds.position_id = Some(outcome.position.id.clone());
        let proceeds = self.ledger_service.create_transaction(proceeds).await?;

        debug!(
            "Unstake from position {} emitted {} and {}",
            outcome.position.id, outcome.transaction.id, proceeds.id
        );
        Ok(ActionResponse {
            transactions: vec![outcome.transaction, proceeds],
        })
    }

    async fn withdraw(&self, params: WithdrawParams) -> Result<ActionResponse> {
        validate_withdraw(&params)?;
        let outcome = self
            .position_service
            .withdraw(to_withdraw_request(params, TransactionType::Withdraw))
            .await?;
        Ok(ActionResponse {
            transactions: vec![outcome.transaction],
        })
    }

    async fn repay_borrow(&self, params: RepayBorrowParams) -> Result<ActionResponse> {
        require_positive("amountUsd", params.amount_usd)?;

        let mut draft = TransactionDraft::new(
            params.date,
            TransactionType::RepayBorrow,
            "USD",
            params.account_id,
            params.amount_usd,
            Decimal::ONE,
        );
        draft.counterparty = params.counterparty;
        draft.note = params.note;
        let transaction = self.ledger_service.create_transaction(draft).await?;

        Ok(ActionResponse {
            transactions: vec![transaction],
        })
    }

    async fn internal_transfer(&self, params: InternalTransferParams) -> Result<ActionResponse> {
        require_positive("quantity", params.quantity)?;
        if params.from_account_id == params.to_account_id {
            return Err(ValidationError::InvalidInput(
                "transfer accounts must differ".to_string(),
            )
            .into());
        }
        let price = params.price_usd.unwrap_or(Decimal::ONE);

        let mut out = TransactionDraft::new(
            params.date,
            TransactionType::TransferOut,
            params.asset.clone(),
            params.from_account_id,
            params.quantity,
            price,
        );
        out.internal_flow = true;
        let out = self.ledger_service.create_transaction(out).await?;

        let mut incoming = TransactionDraft::new(
            params.date,
            TransactionType::TransferIn,
            params.asset,
            params.to_account_id,
            params.quantity,
            price,
        );
        incoming.internal_flow = true;
        let incoming = self.ledger_service.create_transaction(incoming).await?;

        Ok(ActionResponse {
            transactions: vec![out, incoming],
        })
    }

    /// Seeding a tracked balance is not external cash movement.
    async fn init_balance(&self, params: InitBalanceParams) -> Result<ActionResponse> {
        require_positive("quantity", params.quantity)?;

        let mut draft = TransactionDraft::new(
            params.date,
            TransactionType::Deposit,
            params.asset,
            params.account_id,
            params.quantity,
            params.price_usd.unwrap_or(Decimal::ONE),
        );
        draft.internal_flow = true;
        let transaction = self.ledger_service.create_transaction(draft).await?;

        Ok(ActionResponse {
            transactions: vec![transaction],
        })
    }
}

fn require_positive(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "{} must be positive, got {}",
            field, value
        ))
        .into());
    }
    Ok(())
}

fn validate_withdraw(params: &WithdrawParams) -> Result<()> {
    if !params.close_all {
        match params.quantity {
            None => {
                return Err(ValidationError::MissingField("quantity".to_string()).into());
            }
            Some(quantity) => require_positive("quantity", quantity)?,
        }
    }
    Ok(())
}

fn to_withdraw_request(
    params: WithdrawParams,
    transaction_type: TransactionType,
) -> WithdrawRequest {
    WithdrawRequest {
        position_ref: params.position,
        quantity: params.quantity,
        close_all: params.close_all,
        exit_unit_price: params.exit_unit_price,
        exit_total_usd: params.exit_total_usd,
        date: params.date,
        transaction_type,
    }
}
