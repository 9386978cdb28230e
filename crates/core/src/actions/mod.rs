//! Action protocol - the request surface exposed to CLI/HTTP layers.
//!
//! One action may emit multiple ledger entries; the response always carries
//! every transaction written.

mod actions_model;
mod actions_service;


pub use actions_model::{
    ActionRequest, ActionResponse, DepositParams, InitBalanceParams, InternalTransferParams,
    RepayBorrowParams, UnstakeParams, WithdrawParams,
};
pub use actions_service::ActionService;
