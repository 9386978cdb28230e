use async_trait::async_trait;
use chrono::Utc;
use moneta_core::accounts::{Account, AccountRepositoryTrait, NewAccount};
use moneta_core::constants::BASE_CURRENCY;
use moneta_core::errors::DatabaseError;
use moneta_core::Result;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Account store.
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepositoryTrait for MemoryAccountRepository {
    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.accounts
            .read()
            .expect("account store lock poisoned")
            .get(account_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(account_id.to_string()).into())
    }

    fn get_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .accounts
            .read()
            .expect("account store lock poisoned")
            .values()
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        let now = Utc::now();
        let account = Account {
            id: new_account
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_account.name,
            kind: new_account.kind,
            currency: new_account
                .currency
                .unwrap_or_else(|| BASE_CURRENCY.to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let mut accounts = self.accounts.write().expect("account store lock poisoned");
        if accounts.contains_key(&account.id) {
            return Err(DatabaseError::UniqueViolation(account.id.clone()).into());
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn update_account(&self, mut account: Account) -> Result<Account> {
        account.updated_at = Utc::now();
        let mut accounts = self.accounts.write().expect("account store lock poisoned");
        if !accounts.contains_key(&account.id) {
            return Err(DatabaseError::NotFound(account.id.clone()).into());
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }
}
