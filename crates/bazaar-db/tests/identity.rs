//! User and seller profile repository integration tests.

mod common;

use bazaar_core::{Role, SellerStatus};
use bazaar_db::DbError;

use common::{seed_seller, seed_user, test_db};

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = test_db().await;
    seed_user(&db, "alex@example.com").await;

    let duplicate = bazaar_core::User {
        id: uuid::Uuid::new_v4().to_string(),
        email: "alex@example.com".to_string(),
        full_name: "Second Alex".to_string(),
        password_hash: "hash".to_string(),
        created_at: chrono::Utc::now(),
    };

    let err = db.users().insert(&duplicate).await.unwrap_err();
    match err {
        DbError::UniqueViolation { field, value } => {
            assert_eq!(field, "email");
            assert_eq!(value, "alex@example.com");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn role_grants_are_idempotent() {
    let db = test_db().await;
    let user = seed_user(&db, "alex@example.com").await;

    db.users().add_role(&user.id, Role::Buyer).await.unwrap();
    db.users().add_role(&user.id, Role::Admin).await.unwrap();

    let roles = db.users().roles(&user.id).await.unwrap();
    assert_eq!(roles.len(), 2);
    assert!(roles.contains(&Role::Buyer));
    assert!(roles.contains(&Role::Admin));
}

#[tokio::test]
async fn one_seller_profile_per_user() {
    let db = test_db().await;
    let user = seed_user(&db, "alex@example.com").await;
    seed_seller(&db, &user.id, SellerStatus::Pending).await;

    let second = bazaar_core::SellerProfile {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        shop_name: "Second Shop".to_string(),
        description: String::new(),
        status: SellerStatus::Pending,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    let err = db.sellers().insert(&second).await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
}

#[tokio::test]
async fn approve_grants_seller_role() {
    let db = test_db().await;
    let user = seed_user(&db, "alex@example.com").await;
    let profile = seed_seller(&db, &user.id, SellerStatus::Pending).await;

    db.sellers().approve(&profile.id, &user.id).await.unwrap();

    let stored = db.sellers().get_by_id(&profile.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SellerStatus::Approved);

    let roles = db.users().roles(&user.id).await.unwrap();
    assert!(roles.contains(&Role::Seller));

    // A second approve finds no pending profile.
    let err = db.sellers().approve(&profile.id, &user.id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn reject_then_reapply_roundtrip() {
    let db = test_db().await;
    let user = seed_user(&db, "alex@example.com").await;
    let profile = seed_seller(&db, &user.id, SellerStatus::Pending).await;

    db.sellers()
        .transition(&profile.id, SellerStatus::Pending, SellerStatus::Rejected)
        .await
        .unwrap();

    let stored = db.sellers().get_by_id(&profile.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SellerStatus::Rejected);

    db.sellers()
        .reapply(&profile.id, "Better Shop", "second attempt")
        .await
        .unwrap();

    let stored = db.sellers().get_by_id(&profile.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SellerStatus::Pending);
    assert_eq!(stored.shop_name, "Better Shop");

    // Re-applying while already Pending affects no rows.
    let err = db
        .sellers()
        .reapply(&profile.id, "Another", "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn pending_queue_includes_applicant_email() {
    let db = test_db().await;
    let user = seed_user(&db, "applicant@example.com").await;
    seed_seller(&db, &user.id, SellerStatus::Pending).await;

    let approved_user = seed_user(&db, "veteran@example.com").await;
    seed_seller(&db, &approved_user.id, SellerStatus::Approved).await;

    let pending = db.sellers().list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].user_email, "applicant@example.com");
}
