//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Two Read Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product (bazaar-core)        raw row, used by cart/checkout logic     │
//! │                               and by ownership checks                   │
//! │                                                                         │
//! │  ProductListing (this file)   storefront shape: product joined with    │
//! │                               category name and seller shop name        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bazaar_core::Product;

/// A product row joined with its category and seller names, as shown in
/// storefront listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductListing {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub category_name: String,
    pub shop_name: String,
}

const LISTING_SELECT: &str = r#"
    SELECT
        p.id,
        p.name,
        p.description,
        p.price_cents,
        p.stock,
        p.image_url,
        p.is_published,
        c.name AS category_name,
        s.shop_name
    FROM products p
    INNER JOIN categories c ON c.id = p.category_id
    INNER JOIN seller_profiles s ON s.id = p.seller_profile_id
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all published products for the storefront.
    pub async fn list_published(&self) -> DbResult<Vec<ProductListing>> {
        let sql = format!("{LISTING_SELECT} WHERE p.is_published = 1 ORDER BY p.created_at DESC");
        let products = sqlx::query_as::<_, ProductListing>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed published products");
        Ok(products)
    }

    /// Gets one published product by ID, joined for the storefront.
    ///
    /// Unpublished products are invisible here: absent and hidden products
    /// look the same to buyers.
    pub async fn get_published(&self, id: &str) -> DbResult<Option<ProductListing>> {
        let sql = format!("{LISTING_SELECT} WHERE p.id = ?1 AND p.is_published = 1");
        let product = sqlx::query_as::<_, ProductListing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists every product owned by a seller profile, published or not.
    pub async fn list_by_seller(&self, seller_profile_id: &str) -> DbResult<Vec<ProductListing>> {
        let sql = format!("{LISTING_SELECT} WHERE p.seller_profile_id = ?1 ORDER BY p.created_at DESC");
        let products = sqlx::query_as::<_, ProductListing>(&sql)
            .bind(seller_profile_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a raw product row by ID regardless of published state.
    ///
    /// Used by cart/checkout logic and ownership checks; storefront reads
    /// go through [`Self::get_published`].
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, category_id, seller_profile_id, name, description,
                price_cents, stock, image_url, is_published,
                created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, seller = %product.seller_profile_id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, category_id, seller_profile_id, name, description,
                price_cents, stock, image_url, is_published,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.category_id)
        .bind(&product.seller_profile_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.image_url)
        .bind(product.is_published)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's mutable fields.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                category_id = ?2,
                name = ?3,
                description = ?4,
                price_cents = ?5,
                stock = ?6,
                image_url = ?7,
                is_published = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.image_url)
        .bind(product.is_published)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Cart lines referencing it cascade away; order items keep their
    /// frozen snapshots (no foreign key on order_items.product_id).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}
