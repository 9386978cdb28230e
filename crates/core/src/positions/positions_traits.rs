use super::positions_model::{
    ClosureLink, DepositRequest, Position, PositionStatusFilter, WithdrawOutcome, WithdrawRequest,
};
use super::realization::RealizedPnl;
use crate::ledger::{Period, Transaction};
use crate::Result;
use async_trait::async_trait;

/// Trait defining the contract for Position repository operations.
///
/// Multi-record mutations issued inside one service call (position update,
/// exit-date stamp, link writes) must be applied atomically: a partially
/// applied closure produces silently wrong P&L.
#[async_trait]
pub trait PositionRepositoryTrait: Send + Sync {
    fn get_position(&self, position_id: &str) -> Result<Position>;
    fn get_position_by_name(&self, name: &str) -> Result<Option<Position>>;
    fn list_positions(&self, filter: PositionStatusFilter) -> Result<Vec<Position>>;
    async fn create_position(&self, position: Position) -> Result<Position>;
    async fn update_position(&self, position: Position) -> Result<Position>;
    async fn delete_position(&self, position_id: &str) -> Result<()>;

    async fn create_closure_link(&self, link: ClosureLink) -> Result<ClosureLink>;
    async fn update_closure_link(&self, link: ClosureLink) -> Result<ClosureLink>;
    fn get_links_by_deposit(&self, from_tx_id: &str) -> Result<Vec<ClosureLink>>;
    fn list_closure_links(&self) -> Result<Vec<ClosureLink>>;
    async fn delete_links_by_position(&self, position_id: &str) -> Result<()>;
}

/// Trait defining the contract for the position lifecycle service.
#[async_trait]
pub trait PositionServiceTrait: Send + Sync {
    fn get_position(&self, position_id: &str) -> Result<Position>;
    fn list_positions(&self, filter: PositionStatusFilter) -> Result<Vec<Position>>;

    /// Accumulates into an open position or creates a new one; emits the
    /// deposit/stake ledger entry.
    async fn deposit(&self, request: DepositRequest) -> Result<(Position, Transaction)>;

    /// Withdraws from a position, recording a closure link; with
    /// `close_all`, stamps the originating deposit closed.
    async fn withdraw(&self, request: WithdrawRequest) -> Result<WithdrawOutcome>;

    /// Deferred realized P&L over closures whose exit date falls in the
    /// period.
    fn realized_pnl(&self, period: &Period) -> Result<RealizedPnl>;

    /// Deletes a vault position and cascades to its linked transactions.
    /// The only hard delete in the system.
    async fn delete_vault(&self, position_id: &str) -> Result<()>;
}
