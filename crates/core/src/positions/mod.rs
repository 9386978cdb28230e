//! Positions module - weighted-average cost basis, closure links, and the
//! deferred P&L read path.

mod positions_errors;
mod positions_model;
mod positions_service;
mod positions_traits;
mod realization;


#[cfg(test)]
mod realization_tests;

pub use positions_errors::PositionError;
pub use positions_model::{
    ClosureLink, DepositRequest, Position, PositionRef, PositionState, PositionStatusFilter,
    WithdrawOutcome, WithdrawRequest,
};
pub use positions_service::PositionService;
pub use positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
pub use realization::{closure_realized, link_realized_pnl, RealizedPnl};
