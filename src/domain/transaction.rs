use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

pub type TransactionId = i64;
pub type UserId = i64;

/// Id of a resource or service defined outside this system.
pub type DataId = i64;

/// Discriminator selecting which subtype fields a transaction carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Base,
    Market,
    Service,
    Resource,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Base => "base",
            TransactionKind::Market => "market",
            TransactionKind::Service => "service",
            TransactionKind::Resource => "resource",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "base" => Some(TransactionKind::Base),
            "market" => Some(TransactionKind::Market),
            "service" => Some(TransactionKind::Service),
            "resource" => Some(TransactionKind::Resource),
            _ => None,
        }
    }

    /// Capitalized form used in document titles ("Market").
    pub fn title(&self) -> &'static str {
        match self {
            TransactionKind::Base => "Base",
            TransactionKind::Market => "Market",
            TransactionKind::Service => "Service",
            TransactionKind::Resource => "Resource",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Resolved,
    Canceled,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Pending,
        TransactionStatus::Resolved,
        TransactionStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Resolved => "RESOLVED",
            TransactionStatus::Canceled => "CANCELED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(TransactionStatus::Pending),
            "RESOLVED" => Some(TransactionStatus::Resolved),
            "CANCELED" | "CANCELLED" => Some(TransactionStatus::Canceled),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Server-side creation stamp. Callers never supply `created_at`.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// A purchase-like action by a user. Every subtype embeds one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the repository on create; 0 before that
    pub id: TransactionId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub created_at: NaiveDate,
    /// Price in cents, never negative
    pub price_cents: Cents,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Create a new pending transaction. The id must be assigned by the repository.
    pub(crate) fn new(
        user_id: UserId,
        kind: TransactionKind,
        price_cents: Cents,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            kind,
            created_at,
            price_cents,
            status: TransactionStatus::Pending,
        }
    }

    pub fn base(user_id: UserId, price_cents: Cents, created_at: NaiveDate) -> Self {
        Self::new(user_id, TransactionKind::Base, price_cents, created_at)
    }

    /// Move to `status`. Any status may follow any other.
    pub fn transition_to(&mut self, status: TransactionStatus) {
        self.status = status;
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }
}

/// Join row linking a transaction to one external resource or service id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLink {
    /// Owning transaction; 0 until the owner is persisted
    pub transaction_id: TransactionId,
    pub data_id: DataId,
}

/// Build one join row per id, preserving input order.
pub fn build_links(ids: &[DataId]) -> Vec<TransactionLink> {
    ids.iter()
        .map(|&data_id| TransactionLink {
            transaction_id: 0,
            data_id,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub shopping_cart_id: i64,
}

impl MarketTransaction {
    pub fn new(
        user_id: UserId,
        price_cents: Cents,
        created_at: NaiveDate,
        shopping_cart_id: i64,
    ) -> Self {
        Self {
            transaction: Transaction::new(
                user_id,
                TransactionKind::Market,
                price_cents,
                created_at,
            ),
            shopping_cart_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub services: Vec<TransactionLink>,
}

impl ServiceTransaction {
    pub fn new(
        user_id: UserId,
        price_cents: Cents,
        created_at: NaiveDate,
        service_ids: &[DataId],
    ) -> Self {
        Self {
            transaction: Transaction::new(
                user_id,
                TransactionKind::Service,
                price_cents,
                created_at,
            ),
            services: build_links(service_ids),
        }
    }

    pub fn service_ids(&self) -> Vec<DataId> {
        self.services.iter().map(|link| link.data_id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub resources: Vec<TransactionLink>,
}

impl ResourceTransaction {
    pub fn new(
        user_id: UserId,
        price_cents: Cents,
        created_at: NaiveDate,
        resource_ids: &[DataId],
    ) -> Self {
        Self {
            transaction: Transaction::new(
                user_id,
                TransactionKind::Resource,
                price_cents,
                created_at,
            ),
            resources: build_links(resource_ids),
        }
    }

    pub fn resource_ids(&self) -> Vec<DataId> {
        self.resources.iter().map(|link| link.data_id).collect()
    }
}
