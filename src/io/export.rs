use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{DailyReport, TransactionService};
use crate::domain::{MarketTransaction, ResourceTransaction, ServiceTransaction, Transaction};
use crate::storage::TransactionRepository;

/// Full snapshot of every transaction collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub market_transactions: Vec<MarketTransaction>,
    pub service_transactions: Vec<ServiceTransaction>,
    pub resource_transactions: Vec<ResourceTransaction>,
}

/// Exporter for writing transactions and reports out of the service
pub struct Exporter<'a, R> {
    service: &'a TransactionService<R>,
}

impl<'a, R: TransactionRepository> Exporter<'a, R> {
    pub fn new(service: &'a TransactionService<R>) -> Self {
        Self { service }
    }

    /// Export base fields of all transactions to CSV
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.find_all().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "user_id",
            "type",
            "created_at",
            "price_cents",
            "status",
        ])?;

        for tx in &transactions {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.user_id.to_string(),
                tx.kind.as_str().to_string(),
                tx.created_at.to_string(),
                tx.price_cents.to_string(),
                tx.status.as_str().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export every collection as one JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<TransactionSnapshot> {
        let snapshot = TransactionSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions: self.service.find_all().await?,
            market_transactions: self.service.find_all_market_transactions().await?,
            service_transactions: self.service.find_all_service_transactions().await?,
            resource_transactions: self.service.find_all_resource_transactions().await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }

    /// Export the daily report for `date` as JSON
    pub async fn export_daily_report_json<W: Write>(
        &self,
        date: NaiveDate,
        mut writer: W,
    ) -> Result<DailyReport> {
        let report = self.service.get_daily_report_for_date(date).await?;
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(report)
    }
}
