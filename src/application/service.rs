use std::io::Cursor;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::document::{DocumentWriter, PlainTextDocument};
use crate::domain::{
    Cents, CreateMarketTransaction, CreateResourceTransaction, CreateServiceTransaction,
    CreateTransaction, MarketTransaction, PaidTransaction, PaymentRequest, ResourceTransaction,
    ServiceTransaction, Transaction, TransactionId, TransactionStatus, UserId, today,
};
use crate::storage::{SqliteRepository, TransactionRepository};

use super::{AppError, DailyReport, render_invoice, save_to_stream};

/// Application service for recording, querying and reporting transactions.
/// This is the primary interface for any client (CLI, API, etc.).
///
/// Calls are plain request/response over the repository. There is no
/// locking here: concurrent status updates on one id are last-write-wins,
/// and a daily report reads a snapshot that concurrent writes may outdate.
pub struct TransactionService<R = SqliteRepository> {
    repo: R,
}

impl TransactionService<SqliteRepository> {
    /// Open (creating if needed) the database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = SqliteRepository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = SqliteRepository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }
}

impl<R: TransactionRepository> TransactionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    // ========================
    // Queries
    // ========================

    pub async fn find_all(&self) -> Result<Vec<Transaction>, AppError> {
        debug!("listing all transactions");
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_all_market_transactions(&self) -> Result<Vec<MarketTransaction>, AppError> {
        Ok(self.repo.find_all_market_transactions().await?)
    }

    pub async fn find_all_service_transactions(
        &self,
    ) -> Result<Vec<ServiceTransaction>, AppError> {
        Ok(self.repo.find_all_service_transactions().await?)
    }

    pub async fn find_all_resource_transactions(
        &self,
    ) -> Result<Vec<ResourceTransaction>, AppError> {
        Ok(self.repo.find_all_resource_transactions().await?)
    }

    /// Get a transaction by id.
    pub async fn find_by_id(&self, id: TransactionId) -> Result<Transaction, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::TransactionNotFound(id))
    }

    pub async fn find_all_by_created_at(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Transaction>, AppError> {
        debug!(%date, "listing transactions by creation date");
        Ok(self.repo.find_all_by_created_at(date).await?)
    }

    pub async fn find_all_by_user_id(&self, user_id: UserId) -> Result<Vec<Transaction>, AppError> {
        debug!(user_id, "listing transactions by user");
        Ok(self.repo.find_by_user_id(user_id).await?)
    }

    // ========================
    // Creation
    // ========================

    /// Record a purchase, dispatching on the request kind.
    pub async fn pay(&self, request: PaymentRequest) -> Result<PaidTransaction, AppError> {
        debug!(kind = %request.kind(), user_id = request.user_id(), "processing payment request");
        let paid = match request {
            PaymentRequest::Market(req) => PaidTransaction::Market(self.create_market(req).await?),
            PaymentRequest::Service(req) => {
                PaidTransaction::Service(self.create_service(req).await?)
            }
            PaymentRequest::Resource(req) => {
                PaidTransaction::Resource(self.create_resource(req).await?)
            }
        };
        Ok(paid)
    }

    pub async fn create_base(&self, request: CreateTransaction) -> Result<Transaction, AppError> {
        validate_price(request.price_cents)?;
        let mut tx = Transaction::base(request.user_id, request.price_cents, today());
        self.repo.create_transaction(&mut tx).await?;
        log_created(&tx);
        Ok(tx)
    }

    pub async fn create_market(
        &self,
        request: CreateMarketTransaction,
    ) -> Result<MarketTransaction, AppError> {
        validate_price(request.price_cents)?;
        let mut tx = MarketTransaction::new(
            request.user_id,
            request.price_cents,
            today(),
            request.shopping_cart_id,
        );
        self.repo.create_market(&mut tx).await?;
        log_created(&tx.transaction);
        Ok(tx)
    }

    pub async fn create_service(
        &self,
        request: CreateServiceTransaction,
    ) -> Result<ServiceTransaction, AppError> {
        validate_price(request.price_cents)?;
        let mut tx = ServiceTransaction::new(
            request.user_id,
            request.price_cents,
            today(),
            &request.service_ids,
        );
        self.repo.create_service(&mut tx).await?;
        log_created(&tx.transaction);
        Ok(tx)
    }

    pub async fn create_resource(
        &self,
        request: CreateResourceTransaction,
    ) -> Result<ResourceTransaction, AppError> {
        validate_price(request.price_cents)?;
        let mut tx = ResourceTransaction::new(
            request.user_id,
            request.price_cents,
            today(),
            &request.resource_ids,
        );
        self.repo.create_resource(&mut tx).await?;
        log_created(&tx.transaction);
        Ok(tx)
    }

    // ========================
    // Status transitions
    // ========================

    /// Overwrite the status of a transaction. Any status may follow any other.
    pub async fn set_transaction_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<bool, AppError> {
        let mut tx = self.find_by_id(id).await?;
        let previous = tx.status;
        tx.transition_to(status);
        self.repo.update(&tx).await?;
        info!(transaction_id = id, from = %previous, to = %status, "transaction status changed");
        Ok(true)
    }

    pub async fn cancel_transaction(&self, id: TransactionId) -> Result<bool, AppError> {
        self.set_transaction_status(id, TransactionStatus::Canceled)
            .await
    }

    // ========================
    // Documents and reports
    // ========================

    /// Render an invoice as plain text, returned as a stream positioned at 0.
    pub async fn create_invoice(&self, id: TransactionId) -> Result<Cursor<Vec<u8>>, AppError> {
        self.create_invoice_with(id, PlainTextDocument::new()).await
    }

    /// Render an invoice through the given document writer.
    pub async fn create_invoice_with<D: DocumentWriter>(
        &self,
        id: TransactionId,
        mut doc: D,
    ) -> Result<Cursor<Vec<u8>>, AppError> {
        let tx = self.find_by_id(id).await?;
        render_invoice(&tx, &mut doc);
        let stream = save_to_stream(&doc).map_err(|e| AppError::Document(e.to_string()))?;
        debug!(transaction_id = id, bytes = stream.get_ref().len(), "invoice rendered");
        Ok(stream)
    }

    pub async fn get_daily_report_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<DailyReport, AppError> {
        let transactions = self.find_all_by_created_at(date).await?;
        let report = DailyReport::from_transactions(date, &transactions)?;
        debug!(
            %date,
            total = report.total_transactions,
            total_price = report.total_price,
            "daily report computed"
        );
        Ok(report)
    }
}

fn validate_price(price_cents: Cents) -> Result<(), AppError> {
    if price_cents < 0 {
        return Err(AppError::InvalidPrice(price_cents));
    }
    Ok(())
}

fn log_created(tx: &Transaction) {
    info!(
        transaction_id = tx.id,
        kind = %tx.kind,
        user_id = tx.user_id,
        price_cents = tx.price_cents,
        "transaction created"
    );
}
