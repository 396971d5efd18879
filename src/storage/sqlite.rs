use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::domain::{
    MarketTransaction, ResourceTransaction, ServiceTransaction, Transaction, TransactionId,
    TransactionKind, TransactionLink, TransactionStatus, UserId,
};

use super::{SCHEMA, TransactionRepository};

const DATE_FORMAT: &str = "%Y-%m-%d";

const TRANSACTION_COLUMNS: &str = "t.id, t.user_id, t.type, t.created_at, t.price_cents, t.status";

/// SQLite-backed transaction repository.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL, e.g. `sqlite:paybook.db?mode=rwc`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Create any missing tables and indexes.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .context("Failed to create schema")?;
        Ok(())
    }

    /// Connect and make sure the schema exists.
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.init_schema().await?;
        Ok(repo)
    }

    async fn fetch_transactions(&self, kind: TransactionKind) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions t WHERE t.type = ? ORDER BY t.id"
        ))
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to list {} transactions", kind))?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn links_for(&self, transaction_id: TransactionId) -> Result<Vec<TransactionLink>> {
        let rows = sqlx::query(
            r#"
            SELECT transaction_id, data_id
            FROM transaction_links
            WHERE transaction_id = ?
            ORDER BY position
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch transaction links")?;

        Ok(rows
            .iter()
            .map(|row| TransactionLink {
                transaction_id: row.get("transaction_id"),
                data_id: row.get("data_id"),
            })
            .collect())
    }

    /// Insert the base row and return the assigned id.
    async fn insert_transaction(
        conn: &mut SqliteConnection,
        tx: &Transaction,
    ) -> Result<TransactionId> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (user_id, type, created_at, price_cents, status)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(tx.user_id)
        .bind(tx.kind.as_str())
        .bind(tx.created_at.format(DATE_FORMAT).to_string())
        .bind(tx.price_cents)
        .bind(tx.status.as_str())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to save transaction")?;

        Ok(row.get("id"))
    }

    /// Insert join rows in order. Callers stamp the owner id on the links
    /// once the surrounding transaction has committed.
    async fn insert_links(
        conn: &mut SqliteConnection,
        transaction_id: TransactionId,
        links: &[TransactionLink],
    ) -> Result<()> {
        for (position, link) in links.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO transaction_links (transaction_id, data_id, position)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(transaction_id)
            .bind(link.data_id)
            .bind(position as i64)
            .execute(&mut *conn)
            .await
            .context("Failed to save transaction link")?;
        }
        Ok(())
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
        let kind_str: String = row.get("type");
        let status_str: String = row.get("status");
        let created_at_str: String = row.get("created_at");

        Ok(Transaction {
            id: row.get("id"),
            user_id: row.get("user_id"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction type: {}", kind_str))?,
            created_at: NaiveDate::parse_from_str(&created_at_str, DATE_FORMAT)
                .context("Invalid created_at date")?,
            price_cents: row.get("price_cents"),
            status: TransactionStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction status: {}", status_str))?,
        })
    }
}

fn stamp_links(links: &mut [TransactionLink], transaction_id: TransactionId) {
    for link in links {
        link.transaction_id = transaction_id;
    }
}

#[async_trait]
impl TransactionRepository for SqliteRepository {
    async fn find_all(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions t ORDER BY t.id"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn find_all_market_transactions(&self) -> Result<Vec<MarketTransaction>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}, m.shopping_cart_id
            FROM transactions t
            JOIN market_transactions m ON m.transaction_id = t.id
            WHERE t.type = 'market'
            ORDER BY t.id
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list market transactions")?;

        rows.iter()
            .map(|row| {
                Ok(MarketTransaction {
                    transaction: Self::row_to_transaction(row)?,
                    shopping_cart_id: row.get("shopping_cart_id"),
                })
            })
            .collect()
    }

    async fn find_all_service_transactions(&self) -> Result<Vec<ServiceTransaction>> {
        let mut result = Vec::new();
        for transaction in self.fetch_transactions(TransactionKind::Service).await? {
            let services = self.links_for(transaction.id).await?;
            result.push(ServiceTransaction {
                transaction,
                services,
            });
        }
        Ok(result)
    }

    async fn find_all_resource_transactions(&self) -> Result<Vec<ResourceTransaction>> {
        let mut result = Vec::new();
        for transaction in self.fetch_transactions(TransactionKind::Resource).await? {
            let resources = self.links_for(transaction.id).await?;
            result.push(ResourceTransaction {
                transaction,
                resources,
            });
        }
        Ok(result)
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions t WHERE t.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all_by_created_at(&self, date: NaiveDate) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions t WHERE t.created_at = ? ORDER BY t.id"
        ))
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions by date")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions t WHERE t.user_id = ? ORDER BY t.id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions by user")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn create_transaction(&self, tx: &mut Transaction) -> Result<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        let id = Self::insert_transaction(&mut conn, tx).await?;
        tx.id = id;
        Ok(())
    }

    async fn create_market(&self, tx: &mut MarketTransaction) -> Result<()> {
        let mut db_tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let id = Self::insert_transaction(&mut db_tx, &tx.transaction).await?;
        sqlx::query(
            r#"
            INSERT INTO market_transactions (transaction_id, shopping_cart_id)
            VALUES (?, ?)
            "#,
        )
        .bind(id)
        .bind(tx.shopping_cart_id)
        .execute(&mut *db_tx)
        .await
        .context("Failed to save market transaction")?;

        db_tx.commit().await.context("Failed to commit market transaction")?;
        tx.transaction.id = id;
        Ok(())
    }

    async fn create_service(&self, tx: &mut ServiceTransaction) -> Result<()> {
        let mut db_tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let id = Self::insert_transaction(&mut db_tx, &tx.transaction).await?;
        Self::insert_links(&mut db_tx, id, &tx.services).await?;

        db_tx.commit().await.context("Failed to commit service transaction")?;
        tx.transaction.id = id;
        stamp_links(&mut tx.services, id);
        Ok(())
    }

    async fn create_resource(&self, tx: &mut ResourceTransaction) -> Result<()> {
        let mut db_tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let id = Self::insert_transaction(&mut db_tx, &tx.transaction).await?;
        Self::insert_links(&mut db_tx, id, &tx.resources).await?;

        db_tx.commit().await.context("Failed to commit resource transaction")?;
        tx.transaction.id = id;
        stamp_links(&mut tx.resources, id);
        Ok(())
    }

    async fn update(&self, tx: &Transaction) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET user_id = ?, created_at = ?, price_cents = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(tx.user_id)
        .bind(tx.created_at.format(DATE_FORMAT).to_string())
        .bind(tx.price_cents)
        .bind(tx.status.as_str())
        .bind(tx.id)
        .execute(&self.pool)
        .await
        .context("Failed to update transaction")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Transaction {} does not exist", tx.id);
        }
        Ok(())
    }
}
