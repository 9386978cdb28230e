use super::accounts_model::{Account, NewAccount};
use crate::Result;
use async_trait::async_trait;

/// Trait defining the contract for Account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    fn get_account(&self, account_id: &str) -> Result<Account>;
    fn get_accounts(&self) -> Result<Vec<Account>>;
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    async fn update_account(&self, account: Account) -> Result<Account>;
}
