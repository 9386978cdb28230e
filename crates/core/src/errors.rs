//! Core error types for Moneta.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::fx::FxError;
use crate::ledger::LedgerError;
use crate::positions::PositionError;
use crate::quotes::PriceOracleError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
///
/// Validation errors are raised before any write; not-found and closure-policy
/// errors surface as-is to the caller. There is no corruption class: closure
/// atomicity is the preventive mechanism, not post-hoc repair.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Price oracle error: {0}")]
    PriceOracle(#[from] PriceOracleError),

    #[error("Report calculation failed: {0}")]
    Calculation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
///
/// Uses `String` for all error details so that storage implementations can
/// convert their own error types into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A storage transaction failed; nothing was applied.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// Internal/unexpected storage error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and action parameters.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' must not be negative, got {value}")]
    NegativeAmount { field: String, value: String },

    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
