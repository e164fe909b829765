//! Shared fixtures for bazaar-db integration tests.
//!
//! Every test gets its own fully migrated in-memory database, so tests are
//! isolated and need no cleanup.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use chrono::Utc;
use uuid::Uuid;

use bazaar_core::{Product, Role, SellerProfile, SellerStatus, User};
use bazaar_db::{Database, DbConfig};

/// Creates an isolated, migrated in-memory database.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Inserts a user with the Buyer role and returns it.
pub async fn seed_user(db: &Database, email: &str) -> User {
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        full_name: "Test User".to_string(),
        password_hash: "argon2-hash-placeholder".to_string(),
        created_at: Utc::now(),
    };
    db.users().insert(&user).await.expect("insert user");
    db.users()
        .add_role(&user.id, Role::Buyer)
        .await
        .expect("grant buyer role");
    user
}

/// Inserts a seller profile in the given status and returns it.
pub async fn seed_seller(db: &Database, user_id: &str, status: SellerStatus) -> SellerProfile {
    let now = Utc::now();
    let profile = SellerProfile {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        shop_name: "Test Shop".to_string(),
        description: "fixtures".to_string(),
        status,
        created_at: now,
        updated_at: now,
    };
    db.sellers().insert(&profile).await.expect("insert profile");
    profile
}

/// Inserts a published product and returns it.
pub async fn seed_product(
    db: &Database,
    seller_profile_id: &str,
    name: &str,
    price_cents: i64,
    stock: i64,
) -> Product {
    let category = db
        .categories()
        .list()
        .await
        .expect("list categories")
        .into_iter()
        .next()
        .expect("seeded category");

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        category_id: category.id,
        seller_profile_id: seller_profile_id.to_string(),
        name: name.to_string(),
        description: None,
        price_cents,
        stock,
        image_url: None,
        is_published: true,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.expect("insert product");
    product
}

/// Inserts a cart line for (user, product).
pub async fn seed_cart_line(
    db: &Database,
    user_id: &str,
    product: &Product,
    quantity: i64,
) -> bazaar_core::CartItem {
    let now = Utc::now();
    let line = bazaar_core::CartItem {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        product_id: product.id.clone(),
        quantity,
        unit_price_cents: product.price_cents,
        added_at: now,
        updated_at: now,
    };
    db.carts().insert_line(&line).await.expect("insert cart line");
    line
}
