//! Checkout transaction integration tests.
//!
//! These cover the all-or-nothing properties: either the order exists, the
//! stock is decremented, and the cart is empty, or none of those happened.

mod common;

use bazaar_core::{CoreError, OrderStatus, SellerStatus};
use bazaar_db::CheckoutError;
use chrono::Utc;
use uuid::Uuid;

use common::{seed_cart_line, seed_product, seed_seller, seed_user, test_db};

#[tokio::test]
async fn checkout_creates_order_and_clears_cart() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let lamp = seed_product(&db, &profile.id, "Lamp", 1000, 5).await;
    let rug = seed_product(&db, &profile.id, "Rug", 2500, 2).await;

    seed_cart_line(&db, &buyer.id, &lamp, 2).await;
    seed_cart_line(&db, &buyer.id, &rug, 1).await;

    let (order, items) = db.orders().checkout(&buyer.id).await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.user_id, buyer.id);
    assert_eq!(items.len(), 2);

    // Total equals the sum of frozen line totals.
    let sum: bazaar_core::Money = items.iter().map(|i| i.line_total()).sum();
    assert_eq!(order.total_cents, sum.cents());
    assert_eq!(order.total_cents, 2 * 1000 + 2500);

    // Stock decremented by the purchased quantities.
    assert_eq!(db.products().get_by_id(&lamp.id).await.unwrap().unwrap().stock, 3);
    assert_eq!(db.products().get_by_id(&rug.id).await.unwrap().unwrap().stock, 1);

    // Cart is empty afterwards.
    assert_eq!(db.carts().count_for_user(&buyer.id).await.unwrap(), 0);

    // And the order is readable back, scoped to its owner.
    let (loaded, loaded_items) = db
        .orders()
        .get_for_user(&order.id, &buyer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.total_cents, order.total_cents);
    assert_eq!(loaded_items.len(), 2);

    let other = seed_user(&db, "other@example.com").await;
    assert!(db
        .orders()
        .get_for_user(&order.id, &other.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn checkout_empty_cart_fails() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;

    let err = db.orders().checkout(&buyer.id).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Domain(CoreError::EmptyCart)
    ));

    assert!(db.orders().list_for_user(&buyer.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn checkout_is_all_or_nothing_on_stock_shortfall() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let lamp = seed_product(&db, &profile.id, "Lamp", 1000, 5).await;
    let rug = seed_product(&db, &profile.id, "Rug", 2500, 2).await;

    seed_cart_line(&db, &buyer.id, &lamp, 2).await;
    // Stock dropped below the cart quantity after the line was added
    // (another buyer got there first).
    seed_cart_line(&db, &buyer.id, &rug, 2).await;
    let mut depleted = rug.clone();
    depleted.stock = 1;
    db.products().update(&depleted).await.unwrap();

    let err = db.orders().checkout(&buyer.id).await.unwrap_err();
    match err {
        CheckoutError::Domain(CoreError::InsufficientStock { name, available, requested }) => {
            assert_eq!(name, "Rug");
            assert_eq!(available, 1);
            assert_eq!(requested, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Nothing happened: no order, no stock change, cart intact.
    assert!(db.orders().list_for_user(&buyer.id).await.unwrap().is_empty());
    assert_eq!(db.products().get_by_id(&lamp.id).await.unwrap().unwrap().stock, 5);
    assert_eq!(db.products().get_by_id(&rug.id).await.unwrap().unwrap().stock, 1);
    assert_eq!(db.carts().count_for_user(&buyer.id).await.unwrap(), 2);
}

#[tokio::test]
async fn checkout_rejects_unpublished_product() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let lamp = seed_product(&db, &profile.id, "Lamp", 1000, 5).await;

    seed_cart_line(&db, &buyer.id, &lamp, 1).await;

    // Seller unpublishes the product while it sits in the cart.
    let mut hidden = lamp.clone();
    hidden.is_published = false;
    db.products().update(&hidden).await.unwrap();

    let err = db.orders().checkout(&buyer.id).await.unwrap_err();
    match err {
        CheckoutError::Domain(CoreError::ProductUnavailable { name }) => {
            assert_eq!(name, "Lamp");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(db.carts().count_for_user(&buyer.id).await.unwrap(), 1);
    assert_eq!(db.products().get_by_id(&lamp.id).await.unwrap().unwrap().stock, 5);
}

#[tokio::test]
async fn order_snapshots_survive_product_deletion() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let lamp = seed_product(&db, &profile.id, "Lamp", 1000, 5).await;

    seed_cart_line(&db, &buyer.id, &lamp, 1).await;
    let (order, _) = db.orders().checkout(&buyer.id).await.unwrap();

    db.products().delete(&lamp.id).await.unwrap();

    let (_, items) = db
        .orders()
        .get_for_user(&order.id, &buyer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(items[0].name_snapshot, "Lamp");
    assert_eq!(items[0].unit_price_cents, 1000);
}

#[tokio::test]
async fn orders_list_newest_first() {
    let db = test_db().await;
    let buyer = seed_user(&db, "buyer@example.com").await;
    let seller = seed_user(&db, "seller@example.com").await;
    let profile = seed_seller(&db, &seller.id, SellerStatus::Approved).await;
    let lamp = seed_product(&db, &profile.id, "Lamp", 1000, 10).await;

    // Two checkouts with distinct created_at values.
    let first = bazaar_core::CartItem {
        id: Uuid::new_v4().to_string(),
        user_id: buyer.id.clone(),
        product_id: lamp.id.clone(),
        quantity: 1,
        unit_price_cents: lamp.price_cents,
        added_at: Utc::now(),
        updated_at: Utc::now(),
    };
    db.carts().insert_line(&first).await.unwrap();
    db.orders().checkout(&buyer.id).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let second = bazaar_core::CartItem {
        id: Uuid::new_v4().to_string(),
        user_id: buyer.id.clone(),
        product_id: lamp.id.clone(),
        quantity: 2,
        unit_price_cents: lamp.price_cents,
        added_at: Utc::now(),
        updated_at: Utc::now(),
    };
    db.carts().insert_line(&second).await.unwrap();
    let (latest, _) = db.orders().checkout(&buyer.id).await.unwrap();

    let orders = db.orders().list_for_user(&buyer.id).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].0.id, latest.id);
}
