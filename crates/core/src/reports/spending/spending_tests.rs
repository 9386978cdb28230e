use super::spending_service::SpendingService;
use crate::accounts::AccountKind;
use crate::errors::{DatabaseError, Result};
use crate::ledger::{
    derive, LedgerRepositoryTrait, Period, Transaction, TransactionDraft, TransactionFilter,
    TransactionType,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockLedgerRepository {
    transactions: Mutex<Vec<Transaction>>,
}

impl MockLedgerRepository {
    fn add(&self, tx: Transaction) {
        self.transactions.lock().unwrap().push(tx);
    }
}

#[async_trait]
impl LedgerRepositoryTrait for MockLedgerRepository {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .find(|tx| tx.id == transaction_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(transaction_id.to_string()).into())
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect())
    }

    async fn create_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        self.add(transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        Ok(transaction)
    }

    async fn delete_transaction(&self, _transaction_id: &str) -> Result<()> {
        Ok(())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn march() -> Period {
    Period::new(date(2024, 3, 1), date(2024, 3, 31))
}

fn expense(amount: Decimal, tag: Option<&str>, day: u32) -> Transaction {
    let mut draft = TransactionDraft::new(
        date(2024, 3, day),
        TransactionType::Expense,
        "USD",
        "bank",
        amount,
        dec!(1),
    );
    draft.tag = tag.map(str::to_string);
    draft.fx_to_vnd = Some(dec!(25000));
    derive(&draft).unwrap()
}

fn fixture() -> (SpendingService, Arc<MockLedgerRepository>) {
    let ledger = Arc::new(MockLedgerRepository::default());
    let service = SpendingService::new(ledger.clone());
    (service, ledger)
}

#[test]
fn test_spending_grouped_by_tag_and_day() {
    let (service, ledger) = fixture();
    ledger.add(expense(dec!(40), Some("food"), 1));
    ledger.add(expense(dec!(60), Some("food"), 2));
    ledger.add(expense(dec!(200), Some("rent"), 1));
    ledger.add(expense(dec!(15), None, 2));

    let report = service.get_spending(&march()).unwrap();
    assert_eq!(report.total_usd, dec!(315.00));
    assert_eq!(report.total_vnd, dec!(7875000));

    assert_eq!(report.by_tag.len(), 3);
    let food = report.by_tag.iter().find(|t| t.tag == "food").unwrap();
    assert_eq!(food.amount_usd, dec!(100.00));
    let untagged = report.by_tag.iter().find(|t| t.tag == "untagged").unwrap();
    assert_eq!(untagged.amount_usd, dec!(15.00));

    assert_eq!(report.by_day.len(), 2);
    assert_eq!(report.by_day[0].date, date(2024, 3, 1));
    assert_eq!(report.by_day[0].amount_usd, dec!(240.00));
    assert_eq!(report.by_day[1].amount_usd, dec!(75.00));
}

#[test]
fn test_credit_card_expense_excluded() {
    let (service, ledger) = fixture();
    let mut draft = TransactionDraft::new(
        date(2024, 3, 5),
        TransactionType::Expense,
        "USD",
        "visa",
        dec!(120),
        dec!(1),
    );
    draft.account_kind = Some(AccountKind::CreditCard);
    draft.fx_to_vnd = Some(dec!(25000));
    ledger.add(derive(&draft).unwrap());

    let report = service.get_spending(&march()).unwrap();
    assert_eq!(report.total_usd, Decimal::ZERO);
    assert!(report.by_tag.is_empty());
    assert!(report.by_day.is_empty());
}

#[test]
fn test_non_spend_types_excluded() {
    let (service, ledger) = fixture();
    // Cash leaves the account, but these are not spending.
    let mut buy = TransactionDraft::new(
        date(2024, 3, 5),
        TransactionType::Buy,
        "BTC",
        "exchange",
        dec!(1),
        dec!(60000),
    );
    buy.fx_to_vnd = Some(dec!(25000));
    ledger.add(derive(&buy).unwrap());

    let mut repay = TransactionDraft::new(
        date(2024, 3, 6),
        TransactionType::RepayBorrow,
        "USD",
        "bank",
        dec!(500),
        dec!(1),
    );
    repay.fx_to_vnd = Some(dec!(25000));
    ledger.add(derive(&repay).unwrap());

    let report = service.get_spending(&march()).unwrap();
    assert_eq!(report.total_usd, Decimal::ZERO);
}

#[test]
fn test_spending_uses_transaction_own_fx() {
    let (service, ledger) = fixture();
    let mut draft = TransactionDraft::new(
        date(2024, 3, 8),
        TransactionType::Expense,
        "VND",
        "bank-vn",
        dec!(500000),
        dec!(1),
    );
    draft.local_currency = Some("VND".to_string());
    draft.fx_to_usd = Some(dec!(0.00004));
    draft.fx_to_vnd = Some(dec!(1));
    ledger.add(derive(&draft).unwrap());

    let report = service.get_spending(&march()).unwrap();
    assert_eq!(report.total_usd, dec!(20.00));
    assert_eq!(report.total_vnd, dec!(500000));
}

#[test]
fn test_entries_outside_period_excluded() {
    let (service, ledger) = fixture();
    ledger.add(expense(dec!(50), Some("food"), 15));
    let mut april = TransactionDraft::new(
        date(2024, 4, 1),
        TransactionType::Expense,
        "USD",
        "bank",
        dec!(999),
        dec!(1),
    );
    april.fx_to_vnd = Some(dec!(25000));
    ledger.add(derive(&april).unwrap());

    let report = service.get_spending(&march()).unwrap();
    assert_eq!(report.total_usd, dec!(50.00));
}
