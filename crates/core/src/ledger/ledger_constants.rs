//! Transaction type groupings used by the reporting layer.

use super::ledger_model::TransactionType;

/// Types bucketed as financing flows in the cash-flow report.
pub const FINANCING_TYPES: [TransactionType; 3] = [
    TransactionType::Borrow,
    TransactionType::RepayBorrow,
    TransactionType::InterestExpense,
];

/// Investment-related types. These surface only in the by-type breakdown of
/// the cash-flow report, never as a third bucket.
pub const INVESTING_TYPES: [TransactionType; 6] = [
    TransactionType::Buy,
    TransactionType::Sell,
    TransactionType::Stake,
    TransactionType::Unstake,
    TransactionType::Reward,
    TransactionType::Yield,
];

/// Spend-like types recognized by the spending report.
pub const SPEND_TYPES: [TransactionType; 1] = [TransactionType::Expense];

pub fn is_financing(transaction_type: TransactionType) -> bool {
    FINANCING_TYPES.contains(&transaction_type)
}

pub fn is_investing(transaction_type: TransactionType) -> bool {
    INVESTING_TYPES.contains(&transaction_type)
}

pub fn is_spend_like(transaction_type: TransactionType) -> bool {
    SPEND_TYPES.contains(&transaction_type)
}
