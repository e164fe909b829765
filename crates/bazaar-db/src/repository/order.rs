//! # Order Repository
//!
//! Database operations for orders, including the checkout transaction:
//! the one multi-row mutation in the system.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout (single transaction)                        │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. read cart lines + their products                                  │
//! │    2. bazaar_core::cart::plan_checkout  ← pure validation               │
//! │    3. INSERT order                                                      │
//! │    4. per item: INSERT order_item                                       │
//! │                 UPDATE products                                         │
//! │                   SET stock = stock - qty                               │
//! │                   WHERE id = ? AND stock >= qty   ← conditional         │
//! │                 (0 rows affected → abort, roll back everything)         │
//! │    5. DELETE cart lines for the user                                    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either all effects apply or none do. The conditional decrement means  │
//! │  a concurrent checkout of the same product cannot push stock below     │
//! │  zero even if both passed the plan check.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bazaar_core::cart::plan_checkout;
use bazaar_core::{CartItem, CoreError, Order, OrderItem, OrderStatus, Product};

// =============================================================================
// Checkout Error
// =============================================================================

/// Errors from the checkout transaction: either a business rule failed
/// (empty cart, unavailable product, insufficient stock) or the storage
/// layer did.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Db(DbError::from(err))
    }
}

// =============================================================================
// Order Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Converts a user's cart into an order, all-or-nothing.
    ///
    /// See the module docs for the transaction shape. On any failure the
    /// transaction is dropped and rolled back: no order, no stock change,
    /// no cart deletion.
    pub async fn checkout(&self, user_id: &str) -> Result<(Order, Vec<OrderItem>), CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Load cart lines and their live product rows inside the
        // transaction so the plan check sees the state we will mutate.
        let lines = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, user_id, product_id, quantity, unit_price_cents, added_at, updated_at
            FROM cart_items
            WHERE user_id = ?1
            ORDER BY added_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut products: Vec<Product> = Vec::with_capacity(lines.len());
        for line in &lines {
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
            .bind(&line.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(product) = product {
                products.push(product);
            }
        }

        // Pure re-validation: empty cart, unpublished products, stock.
        let plan = plan_checkout(&lines, &products)?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            status: OrderStatus::Pending,
            total_cents: plan.total.cents(),
            created_at: now,
        };

        debug!(order_id = %order.id, total = %order.total_cents, "Creating order");

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, status, total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.status)
        .bind(order.total_cents)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(plan.items.len());
        for planned in &plan.items {
            let item = OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                product_id: planned.product_id.clone(),
                name_snapshot: planned.name_snapshot.clone(),
                unit_price_cents: planned.unit_price_cents,
                quantity: planned.quantity,
            };

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, name_snapshot, unit_price_cents, quantity
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            // Conditional decrement: only succeeds while stock covers the
            // quantity. Zero rows affected means the plan check raced a
            // concurrent mutation; dropping the transaction rolls back
            // everything done so far.
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?1, updated_at = ?3
                WHERE id = ?2 AND stock >= ?1
                "#,
            )
            .bind(item.quantity)
            .bind(&item.product_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                        .bind(&item.product_id)
                        .fetch_optional(&mut *tx)
                        .await?
                        .unwrap_or(0);

                return Err(CheckoutError::Domain(CoreError::InsufficientStock {
                    name: item.name_snapshot.clone(),
                    available,
                    requested: item.quantity,
                }));
            }

            items.push(item);
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(order_id = %order.id, user_id = %user_id, items = items.len(), total = %order.total_cents, "Checkout complete");

        Ok((order, items))
    }

    /// Gets one of a user's orders with its items.
    ///
    /// Scoped to the owner: another user's order id returns None.
    pub async fn get_for_user(
        &self,
        order_id: &str,
        user_id: &str,
    ) -> DbResult<Option<(Order, Vec<OrderItem>)>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, status, total_cents, created_at
            FROM orders
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = self.items(&order.id).await?;
        Ok(Some((order, items)))
    }

    /// Lists a user's orders, newest first, each with its items.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<(Order, Vec<OrderItem>)>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, status, total_cents, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items(&order.id).await?;
            result.push((order, items));
        }

        Ok(result)
    }

    /// Gets the items of an order.
    async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, name_snapshot, unit_price_cents, quantity
            FROM order_items
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
