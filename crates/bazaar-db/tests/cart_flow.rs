//! Cart repository integration tests against an in-memory database.

mod common;

use bazaar_core::SellerStatus;
use bazaar_db::DbError;
use chrono::Utc;

use common::{seed_cart_line, seed_product, seed_seller, seed_user, test_db};

#[tokio::test]
async fn add_and_view_reflects_line() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let product = seed_product(&db, &profile.id, "Walnut Desk Lamp", 4999, 5).await;

    seed_cart_line(&db, &buyer.id, &product, 2).await;

    let view = db.carts().view(&buyer.id).await.unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].product_name, "Walnut Desk Lamp");
    assert_eq!(view[0].quantity, 2);
    assert_eq!(view[0].unit_price_cents, 4999);
    assert_eq!(view[0].line_total().cents(), 9998);

    let total: bazaar_core::Money = view.iter().map(|l| l.line_total()).sum();
    assert_eq!(total.cents(), 9998);
}

#[tokio::test]
async fn one_line_per_user_product_pair() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let product = seed_product(&db, &profile.id, "Rug", 2500, 10).await;

    let line = seed_cart_line(&db, &buyer.id, &product, 1).await;

    // A second insert for the same (user, product) violates the unique index.
    let mut duplicate = line.clone();
    duplicate.id = uuid::Uuid::new_v4().to_string();
    let err = db.carts().insert_line(&duplicate).await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
}

#[tokio::test]
async fn top_up_refreshes_price_snapshot() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let product = seed_product(&db, &profile.id, "Rug", 2500, 10).await;

    let line = seed_cart_line(&db, &buyer.id, &product, 1).await;

    // Top up with a new price, as the add operation does after a catalog
    // price change.
    db.carts()
        .update_line(&line.id, 3, 2999, Utc::now())
        .await
        .unwrap();

    let stored = db
        .carts()
        .get_line(&buyer.id, &product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.quantity, 3);
    assert_eq!(stored.unit_price_cents, 2999);
}

#[tokio::test]
async fn partial_remove_keeps_snapshot() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let product = seed_product(&db, &profile.id, "Rug", 2500, 10).await;

    let line = seed_cart_line(&db, &buyer.id, &product, 5).await;

    db.carts().set_quantity(&line.id, 3).await.unwrap();

    let stored = db
        .carts()
        .get_line(&buyer.id, &product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.quantity, 3);
    assert_eq!(stored.unit_price_cents, 2500);
}

#[tokio::test]
async fn delete_and_clear() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let lamp = seed_product(&db, &profile.id, "Lamp", 1000, 5).await;
    let rug = seed_product(&db, &profile.id, "Rug", 2500, 5).await;

    let lamp_line = seed_cart_line(&db, &buyer.id, &lamp, 1).await;
    seed_cart_line(&db, &buyer.id, &rug, 1).await;

    db.carts().delete_line(&lamp_line.id).await.unwrap();
    assert_eq!(db.carts().count_for_user(&buyer.id).await.unwrap(), 1);

    db.carts().clear_for_user(&buyer.id).await.unwrap();
    assert_eq!(db.carts().count_for_user(&buyer.id).await.unwrap(), 0);

    // Deleting an already-deleted line is NotFound.
    let err = db.carts().delete_line(&lamp_line.id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}
