use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    MarketTransaction, ResourceTransaction, ServiceTransaction, Transaction, TransactionId, UserId,
};

/// Storage the transaction service delegates to.
///
/// Implementations own atomicity of each individual create/update call.
/// Nothing here serializes concurrent writers: two `update` calls on the
/// same id race and the last one wins.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// All transactions of every kind, ordered by id.
    async fn find_all(&self) -> Result<Vec<Transaction>>;

    async fn find_all_market_transactions(&self) -> Result<Vec<MarketTransaction>>;

    async fn find_all_service_transactions(&self) -> Result<Vec<ServiceTransaction>>;

    async fn find_all_resource_transactions(&self) -> Result<Vec<ResourceTransaction>>;

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>>;

    async fn find_all_by_created_at(&self, date: NaiveDate) -> Result<Vec<Transaction>>;

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Transaction>>;

    /// Persist a base transaction and assign its id.
    async fn create_transaction(&self, tx: &mut Transaction) -> Result<()>;

    /// Persist a market transaction and assign its id.
    async fn create_market(&self, tx: &mut MarketTransaction) -> Result<()>;

    /// Persist a service transaction with its join rows, assigning ids
    /// to the transaction and to every link.
    async fn create_service(&self, tx: &mut ServiceTransaction) -> Result<()>;

    /// Persist a resource transaction with its join rows.
    async fn create_resource(&self, tx: &mut ResourceTransaction) -> Result<()>;

    /// Overwrite the stored base fields of an existing transaction.
    async fn update(&self, tx: &Transaction) -> Result<()>;
}
