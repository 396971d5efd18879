use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Transaction, TransactionStatus};

use super::AppError;

/// Aggregate over the transactions created on one date. Computed on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total_transactions: i64,
    pub total_pending: i64,
    pub total_resolved: i64,
    pub total_canceled: i64,
    /// Sum of prices in cents, no currency conversion
    pub total_price: Cents,
}

impl DailyReport {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    /// Fold transactions into a report for `date` in one pass.
    /// Callers pass the transactions created on that date.
    ///
    /// Fails with `ReportOverflow` when the price total does not fit in
    /// `Cents`.
    pub fn from_transactions<'a>(
        date: NaiveDate,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<Self, AppError> {
        transactions
            .into_iter()
            .try_fold(Self::empty(date), |mut report, tx| {
                report.total_transactions += 1;
                match tx.status {
                    TransactionStatus::Pending => report.total_pending += 1,
                    TransactionStatus::Resolved => report.total_resolved += 1,
                    TransactionStatus::Canceled => report.total_canceled += 1,
                }
                report.total_price = report
                    .total_price
                    .checked_add(tx.price_cents)
                    .ok_or(AppError::ReportOverflow(date))?;
                Ok(report)
            })
    }
}
