use thiserror::Error;

/// Errors specific to position lifecycle operations.
#[derive(Error, Debug)]
pub enum PositionError {
    #[error("Position not found: {0}")]
    NotFound(String),

    /// Deposits may only accumulate into open positions.
    #[error("Closure policy violation: {0}")]
    ClosurePolicy(String),

    /// A position without an originating deposit entry cannot be linked
    /// or closed.
    #[error("Position {0} has no originating deposit transaction")]
    MissingEntryTransaction(String),
}
