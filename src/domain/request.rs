use serde::{Deserialize, Serialize};

use super::{
    Cents, DataId, MarketTransaction, ResourceTransaction, ServiceTransaction, Transaction,
    TransactionKind, UserId,
};

/// Request for a plain `base` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransaction {
    pub user_id: UserId,
    pub price_cents: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMarketTransaction {
    pub user_id: UserId,
    pub price_cents: Cents,
    pub shopping_cart_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceTransaction {
    pub user_id: UserId,
    pub price_cents: Cents,
    #[serde(default)]
    pub service_ids: Vec<DataId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResourceTransaction {
    pub user_id: UserId,
    pub price_cents: Cents,
    #[serde(default)]
    pub resource_ids: Vec<DataId>,
}

/// The purchase kinds `pay` accepts. Base transactions are not payable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentRequest {
    Market(CreateMarketTransaction),
    Service(CreateServiceTransaction),
    Resource(CreateResourceTransaction),
}

impl PaymentRequest {
    pub fn kind(&self) -> TransactionKind {
        match self {
            PaymentRequest::Market(_) => TransactionKind::Market,
            PaymentRequest::Service(_) => TransactionKind::Service,
            PaymentRequest::Resource(_) => TransactionKind::Resource,
        }
    }

    pub fn user_id(&self) -> UserId {
        match self {
            PaymentRequest::Market(req) => req.user_id,
            PaymentRequest::Service(req) => req.user_id,
            PaymentRequest::Resource(req) => req.user_id,
        }
    }
}

/// What `pay` created, typed by the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaidTransaction {
    Market(MarketTransaction),
    Service(ServiceTransaction),
    Resource(ResourceTransaction),
}

impl PaidTransaction {
    pub fn transaction(&self) -> &Transaction {
        match self {
            PaidTransaction::Market(tx) => &tx.transaction,
            PaidTransaction::Service(tx) => &tx.transaction,
            PaidTransaction::Resource(tx) => &tx.transaction,
        }
    }
}
