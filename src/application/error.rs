use thiserror::Error;

use chrono::NaiveDate;

use crate::domain::{Cents, TransactionId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid price: {0} (prices cannot be negative)")]
    InvalidPrice(Cents),

    #[error("Price total for {0} exceeds the representable range")]
    ReportOverflow(NaiveDate),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::TransactionNotFound(_))
    }
}
