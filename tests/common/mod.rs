// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use paybook::application::TransactionService;
use paybook::domain::{
    MarketTransaction, ResourceTransaction, ServiceTransaction, Transaction, TransactionId,
    TransactionKind, UserId,
};
use paybook::storage::TransactionRepository;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(TransactionService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = TransactionService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a YYYY-MM-DD string
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// In-memory repository that records which create call ran.
#[derive(Default)]
pub struct RecordingRepository {
    state: Mutex<State>,
    /// When set, every call fails with this message
    pub fail_with: Option<String>,
}

#[derive(Default)]
struct State {
    transactions: Vec<Transaction>,
    market: Vec<MarketTransaction>,
    service: Vec<ServiceTransaction>,
    resource: Vec<ResourceTransaction>,
    create_calls: Vec<TransactionKind>,
    update_calls: usize,
}

impl RecordingRepository {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn create_calls(&self) -> Vec<TransactionKind> {
        self.state.lock().unwrap().create_calls.clone()
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().update_calls
    }

    /// Store a transaction as-is, keeping its id and date.
    pub fn seed(&self, tx: Transaction) {
        self.state.lock().unwrap().transactions.push(tx);
    }

    fn check(&self) -> Result<()> {
        if let Some(message) = &self.fail_with {
            bail!("{}", message);
        }
        Ok(())
    }

    fn insert(&self, tx: &mut Transaction) -> TransactionId {
        let mut state = self.state.lock().unwrap();
        tx.id = state.transactions.len() as TransactionId + 1;
        state.transactions.push(tx.clone());
        state.create_calls.push(tx.kind);
        tx.id
    }
}

#[async_trait]
impl TransactionRepository for RecordingRepository {
    async fn find_all(&self) -> Result<Vec<Transaction>> {
        self.check()?;
        Ok(self.state.lock().unwrap().transactions.clone())
    }

    async fn find_all_market_transactions(&self) -> Result<Vec<MarketTransaction>> {
        self.check()?;
        Ok(self.state.lock().unwrap().market.clone())
    }

    async fn find_all_service_transactions(&self) -> Result<Vec<ServiceTransaction>> {
        self.check()?;
        Ok(self.state.lock().unwrap().service.clone())
    }

    async fn find_all_resource_transactions(&self) -> Result<Vec<ResourceTransaction>> {
        self.check()?;
        Ok(self.state.lock().unwrap().resource.clone())
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state.transactions.iter().find(|tx| tx.id == id).cloned())
    }

    async fn find_all_by_created_at(&self, date: NaiveDate) -> Result<Vec<Transaction>> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .transactions
            .iter()
            .filter(|tx| tx.created_at == date)
            .cloned()
            .collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Transaction>> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_transaction(&self, tx: &mut Transaction) -> Result<()> {
        self.check()?;
        self.insert(tx);
        Ok(())
    }

    async fn create_market(&self, tx: &mut MarketTransaction) -> Result<()> {
        self.check()?;
        self.insert(&mut tx.transaction);
        self.state.lock().unwrap().market.push(tx.clone());
        Ok(())
    }

    async fn create_service(&self, tx: &mut ServiceTransaction) -> Result<()> {
        self.check()?;
        let id = self.insert(&mut tx.transaction);
        for link in &mut tx.services {
            link.transaction_id = id;
        }
        self.state.lock().unwrap().service.push(tx.clone());
        Ok(())
    }

    async fn create_resource(&self, tx: &mut ResourceTransaction) -> Result<()> {
        self.check()?;
        let id = self.insert(&mut tx.transaction);
        for link in &mut tx.resources {
            link.transaction_id = id;
        }
        self.state.lock().unwrap().resource.push(tx.clone());
        Ok(())
    }

    async fn update(&self, tx: &Transaction) -> Result<()> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;
        match state.transactions.iter_mut().find(|stored| stored.id == tx.id) {
            Some(stored) => {
                *stored = tx.clone();
                Ok(())
            }
            None => bail!("Transaction {} does not exist", tx.id),
        }
    }
}
