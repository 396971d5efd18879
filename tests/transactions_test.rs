mod common;

use anyhow::Result;
use common::test_service;
use paybook::application::AppError;
use paybook::domain::{
    CreateMarketTransaction, CreateResourceTransaction, CreateServiceTransaction,
    CreateTransaction, PaidTransaction, PaymentRequest, TransactionKind, TransactionStatus, today,
};

#[tokio::test]
async fn test_create_base_is_pending_and_stamped_today() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let tx = service
        .create_base(CreateTransaction {
            user_id: 7,
            price_cents: 2500,
        })
        .await?;

    assert!(tx.id > 0);
    assert_eq!(tx.kind, TransactionKind::Base);
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert_eq!(tx.created_at, today());

    let stored = service.find_by_id(tx.id).await?;
    assert_eq!(stored, tx);

    Ok(())
}

#[tokio::test]
async fn test_create_market_persists_cart_reference() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let market = service
        .create_market(CreateMarketTransaction {
            user_id: 3,
            price_cents: 1999,
            shopping_cart_id: 42,
        })
        .await?;

    assert_eq!(market.transaction.kind, TransactionKind::Market);
    assert_eq!(market.transaction.status, TransactionStatus::Pending);
    assert_eq!(market.transaction.created_at, today());

    let all_market = service.find_all_market_transactions().await?;
    assert_eq!(all_market.len(), 1);
    assert_eq!(all_market[0], market);
    assert_eq!(all_market[0].shopping_cart_id, 42);

    Ok(())
}

#[tokio::test]
async fn test_create_service_keeps_one_link_per_id_in_order() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let created = service
        .create_service(CreateServiceTransaction {
            user_id: 1,
            price_cents: 5000,
            service_ids: vec![30, 10, 20, 10],
        })
        .await?;

    assert_eq!(created.service_ids(), vec![30, 10, 20, 10]);
    assert!(
        created
            .services
            .iter()
            .all(|link| link.transaction_id == created.transaction.id)
    );

    let stored = service.find_all_service_transactions().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].service_ids(), vec![30, 10, 20, 10]);
    assert_eq!(stored[0], created);

    Ok(())
}

#[tokio::test]
async fn test_create_resource_mirrors_service() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let created = service
        .create_resource(CreateResourceTransaction {
            user_id: 2,
            price_cents: 800,
            resource_ids: vec![5, 6],
        })
        .await?;
    let empty = service
        .create_resource(CreateResourceTransaction {
            user_id: 2,
            price_cents: 0,
            resource_ids: vec![],
        })
        .await?;

    let stored = service.find_all_resource_transactions().await?;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0], created);
    assert_eq!(stored[0].resource_ids(), vec![5, 6]);
    assert!(stored[1].resources.is_empty());
    assert_eq!(stored[1].transaction.id, empty.transaction.id);

    // Resource links never show up under services
    assert!(service.find_all_service_transactions().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_negative_price_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .create_market(CreateMarketTransaction {
            user_id: 1,
            price_cents: -1,
            shopping_cart_id: 1,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidPrice(-1)));
    assert!(service.find_all().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_pay_dispatches_to_matching_kind() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let market = service
        .pay(PaymentRequest::Market(CreateMarketTransaction {
            user_id: 1,
            price_cents: 100,
            shopping_cart_id: 9,
        }))
        .await?;
    let svc = service
        .pay(PaymentRequest::Service(CreateServiceTransaction {
            user_id: 1,
            price_cents: 200,
            service_ids: vec![1],
        }))
        .await?;
    let resource = service
        .pay(PaymentRequest::Resource(CreateResourceTransaction {
            user_id: 1,
            price_cents: 300,
            resource_ids: vec![2, 3],
        }))
        .await?;

    assert!(matches!(market, PaidTransaction::Market(_)));
    assert!(matches!(svc, PaidTransaction::Service(_)));
    assert!(matches!(resource, PaidTransaction::Resource(_)));

    assert_eq!(service.find_all_market_transactions().await?.len(), 1);
    assert_eq!(service.find_all_service_transactions().await?.len(), 1);
    assert_eq!(service.find_all_resource_transactions().await?.len(), 1);

    let kinds: Vec<TransactionKind> = service
        .find_all()
        .await?
        .into_iter()
        .map(|tx| tx.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Market,
            TransactionKind::Service,
            TransactionKind::Resource
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_find_by_id_unknown_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.find_by_id(999).await.unwrap_err();
    assert!(matches!(err, AppError::TransactionNotFound(999)));
    assert!(err.is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_find_by_user_and_date() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for (user_id, price_cents) in [(1, 100), (2, 200), (1, 300)] {
        service
            .create_base(CreateTransaction {
                user_id,
                price_cents,
            })
            .await?;
    }

    let user_one = service.find_all_by_user_id(1).await?;
    assert_eq!(user_one.len(), 2);
    assert!(user_one.iter().all(|tx| tx.user_id == 1));
    assert!(service.find_all_by_user_id(99).await?.is_empty());

    assert_eq!(service.find_all_by_created_at(today()).await?.len(), 3);
    let yesterday = today().pred_opt().unwrap();
    assert!(service.find_all_by_created_at(yesterday).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_set_status_then_find_returns_new_status() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let tx = service
        .create_base(CreateTransaction {
            user_id: 1,
            price_cents: 100,
        })
        .await?;

    // Every status may follow every other, including itself
    for status in [
        TransactionStatus::Resolved,
        TransactionStatus::Pending,
        TransactionStatus::Canceled,
        TransactionStatus::Canceled,
        TransactionStatus::Resolved,
    ] {
        assert!(service.set_transaction_status(tx.id, status).await?);
        let stored = service.find_by_id(tx.id).await?;
        assert_eq!(stored.status, status);
        assert_eq!(stored.kind, tx.kind);
        assert_eq!(stored.price_cents, tx.price_cents);
    }

    Ok(())
}

#[tokio::test]
async fn test_set_status_unknown_id_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .set_transaction_status(12, TransactionStatus::Resolved)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TransactionNotFound(12)));

    Ok(())
}

#[tokio::test]
async fn test_cancel_transaction_sets_canceled() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let market = service
        .create_market(CreateMarketTransaction {
            user_id: 1,
            price_cents: 100,
            shopping_cart_id: 3,
        })
        .await?;
    let id = market.transaction.id;

    assert!(service.cancel_transaction(id).await?);
    assert_eq!(
        service.find_by_id(id).await?.status,
        TransactionStatus::Canceled
    );

    let err = service.cancel_transaction(id + 100).await.unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}
