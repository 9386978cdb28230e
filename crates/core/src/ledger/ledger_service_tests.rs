use crate::accounts::{Account, AccountKind, AccountRepositoryTrait, NewAccount};
use crate::errors::{DatabaseError, Result};
use crate::fx::{ExchangeRate, FxServiceTrait, NewExchangeRate};
use crate::ledger::{
    LedgerRepositoryTrait, LedgerService, LedgerServiceTrait, Transaction, TransactionDraft,
    TransactionFilter, TransactionStatus, TransactionType,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// --- Mock ledger repository ---

#[derive(Default)]
struct MockLedgerRepository {
    transactions: Mutex<HashMap<String, Transaction>>,
}

#[async_trait]
impl LedgerRepositoryTrait for MockLedgerRepository {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(transaction_id.to_string()).into())
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut txs: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .values()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        txs.sort_by_key(|tx| tx.transaction_date);
        Ok(txs)
    }

    async fn create_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        self.transactions.lock().unwrap().remove(transaction_id);
        Ok(())
    }
}

// --- Mock account repository ---

struct MockAccountRepository {
    accounts: HashMap<String, Account>,
}

impl MockAccountRepository {
    fn new(accounts: Vec<(&str, AccountKind)>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|(id, kind)| {
                (
                    id.to_string(),
                    Account {
                        id: id.to_string(),
                        name: id.to_string(),
                        kind,
                        currency: "USD".to_string(),
                        is_active: true,
                        created_at: Utc::now(),
                        updated_at: Utc::now(),
                    },
                )
            })
            .collect();
        MockAccountRepository { accounts }
    }
}

#[async_trait]
impl AccountRepositoryTrait for MockAccountRepository {
    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(account_id.to_string()).into())
    }

    fn get_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.values().cloned().collect())
    }

    async fn create_account(&self, _new_account: NewAccount) -> Result<Account> {
        unimplemented!()
    }

    async fn update_account(&self, _account: Account) -> Result<Account> {
        unimplemented!()
    }
}

// --- Mock FX service ---

#[derive(Default)]
struct MockFxService {
    rates: HashMap<(String, String), Decimal>,
}

impl MockFxService {
    fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates.insert((from.to_string(), to.to_string()), rate);
        self
    }
}

#[async_trait]
impl FxServiceTrait for MockFxService {
    fn rate_as_of(&self, from: &str, to: &str, _as_of: NaiveDate) -> Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| {
                crate::fx::FxError::RateNotFound(format!("{}/{}", from, to)).into()
            })
    }

    fn convert_as_of(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal> {
        Ok(amount * self.rate_as_of(from, to, as_of)?)
    }

    async fn add_rate(&self, _new_rate: NewExchangeRate) -> Result<ExchangeRate> {
        unimplemented!()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_service() -> LedgerService {
    let ledger = Arc::new(MockLedgerRepository::default());
    let accounts = Arc::new(MockAccountRepository::new(vec![
        ("bank", AccountKind::Bank),
        ("visa", AccountKind::CreditCard),
    ]));
    let fx = Arc::new(
        MockFxService::default()
            .with_rate("USD", "VND", dec!(25000))
            .with_rate("EUR", "USD", dec!(1.10)),
    );
    LedgerService::new(ledger, accounts, fx)
}

#[tokio::test]
async fn test_create_resolves_account_kind_for_credit_card() {
    let service = make_service();
    let draft = TransactionDraft::new(
        date(2024, 5, 1),
        TransactionType::Expense,
        "USD",
        "visa",
        dec!(1),
        dec!(40),
    );
    let tx = service.create_transaction(draft).await.unwrap();
    assert_eq!(tx.cash_flow_usd, Decimal::ZERO);
    assert_eq!(tx.delta_qty, dec!(-1));
}

#[tokio::test]
async fn test_create_resolves_missing_fx_and_stamps_provenance() {
    let service = make_service();
    let draft = TransactionDraft::new(
        date(2024, 5, 1),
        TransactionType::Buy,
        "BTC",
        "bank",
        dec!(1),
        dec!(100),
    );
    let tx = service.create_transaction(draft).await.unwrap();

    assert_eq!(tx.fx_to_usd, Decimal::ONE);
    assert_eq!(tx.fx_to_vnd, dec!(25000));
    assert_eq!(tx.amount_vnd, dec!(2500000));
    assert_eq!(tx.fx_source.as_deref(), Some("fx_store"));
    assert!(tx.fx_timestamp.is_some());
}

#[tokio::test]
async fn test_create_composes_cross_rate_through_usd() {
    let service = make_service();
    let mut draft = TransactionDraft::new(
        date(2024, 5, 1),
        TransactionType::Expense,
        "EUR",
        "bank",
        dec!(1),
        dec!(100),
    );
    draft.local_currency = Some("EUR".to_string());
    let tx = service.create_transaction(draft).await.unwrap();

    assert_eq!(tx.amount_usd, dec!(110.00));
    // EUR -> VND composed as EUR->USD->VND.
    assert_eq!(tx.amount_vnd, dec!(2750000));
}

#[tokio::test]
async fn test_amend_re_derives_but_preserves_fx_provenance() {
    let service = make_service();
    let mut draft = TransactionDraft::new(
        date(2024, 5, 1),
        TransactionType::Buy,
        "BTC",
        "bank",
        dec!(1),
        dec!(100),
    );
    draft.fx_source = Some("vietcombank".to_string());
    draft.fx_timestamp = Some(Utc::now());
    let tx = service.create_transaction(draft.clone()).await.unwrap();
    let original_created = tx.created_at;
    let original_stamp = tx.fx_timestamp;

    draft.quantity = dec!(2);
    draft.fx_source = None;
    draft.fx_timestamp = None;
    let amended = service.amend_transaction(&tx.id, draft).await.unwrap();

    assert_eq!(amended.id, tx.id);
    assert_eq!(amended.amount_usd, dec!(200.00));
    assert_eq!(amended.fx_source.as_deref(), Some("vietcombank"));
    assert_eq!(amended.fx_timestamp, original_stamp);
    assert_eq!(amended.created_at, original_created);
}

#[tokio::test]
async fn test_void_excludes_from_scans() {
    let service = make_service();
    let draft = TransactionDraft::new(
        date(2024, 5, 1),
        TransactionType::Buy,
        "BTC",
        "bank",
        dec!(1),
        dec!(100),
    );
    let tx = service.create_transaction(draft).await.unwrap();

    let voided = service.void_transaction(&tx.id).await.unwrap();
    assert_eq!(voided.status, TransactionStatus::Void);

    let visible = service
        .list_transactions(&TransactionFilter::default())
        .unwrap();
    assert!(visible.is_empty());

    let all = service
        .list_transactions(&TransactionFilter {
            include_void: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_stamp_exit_date_touches_nothing_else() {
    let service = make_service();
    let mut draft = TransactionDraft::new(
        date(2024, 5, 1),
        TransactionType::Stake,
        "USDT",
        "bank",
        dec!(1000),
        dec!(1),
    );
    draft.fx_source = Some("manual".to_string());
    let tx = service.create_transaction(draft).await.unwrap();

    let stamped = service
        .stamp_exit_date(&tx.id, date(2024, 6, 1))
        .await
        .unwrap();
    assert_eq!(stamped.exit_date, Some(date(2024, 6, 1)));
    assert_eq!(stamped.amount_usd, tx.amount_usd);
    assert_eq!(stamped.fx_source.as_deref(), Some("manual"));
}
