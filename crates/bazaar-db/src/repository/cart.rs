//! # Cart Repository
//!
//! Database operations for cart lines.
//!
//! One row per (user, product) pair, enforced by a unique index. The
//! price snapshot column is refreshed to the product's current price on
//! every add/top-up (see bazaar-core's CartItem docs and DESIGN.md).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bazaar_core::{CartItem, Money};

/// A cart line joined with live product data, as shown by GET /cart/my.
///
/// Name and image come from the live product; the unit price is the
/// cart's snapshot.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLineView {
    pub product_id: String,
    pub product_name: String,
    pub image_url: Option<String>,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl CartLineView {
    /// Line total (snapshot unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Gets the (user, product) line, if present.
    pub async fn get_line(&self, user_id: &str, product_id: &str) -> DbResult<Option<CartItem>> {
        let line = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, user_id, product_id, quantity, unit_price_cents, added_at, updated_at
            FROM cart_items
            WHERE user_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(line)
    }

    /// Lists all of a user's cart lines, oldest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<CartItem>> {
        let lines = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, user_id, product_id, quantity, unit_price_cents, added_at, updated_at
            FROM cart_items
            WHERE user_id = ?1
            ORDER BY added_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Counts a user's distinct cart lines.
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Inserts a new cart line.
    pub async fn insert_line(&self, line: &CartItem) -> DbResult<()> {
        debug!(user_id = %line.user_id, product_id = %line.product_id, qty = %line.quantity, "Inserting cart line");

        sqlx::query(
            r#"
            INSERT INTO cart_items (
                id, user_id, product_id, quantity, unit_price_cents, added_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&line.id)
        .bind(&line.user_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.added_at)
        .bind(line.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sets a line's quantity and refreshes its price snapshot (top-up).
    pub async fn update_line(
        &self,
        id: &str,
        quantity: i64,
        unit_price_cents: i64,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %id, qty = %quantity, "Updating cart line");

        let result = sqlx::query(
            r#"
            UPDATE cart_items
            SET quantity = ?2, unit_price_cents = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(unit_price_cents)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart item", id));
        }

        Ok(())
    }

    /// Sets a line's quantity without touching the price snapshot
    /// (partial remove).
    pub async fn set_quantity(&self, id: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, qty = %quantity, "Decrementing cart line");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cart_items
            SET quantity = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart item", id));
        }

        Ok(())
    }

    /// Deletes one line.
    pub async fn delete_line(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting cart line");

        let result = sqlx::query("DELETE FROM cart_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart item", id));
        }

        Ok(())
    }

    /// Deletes every line for a user.
    pub async fn clear_for_user(&self, user_id: &str) -> DbResult<()> {
        debug!(user_id = %user_id, "Clearing cart");

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Returns a user's cart joined with live product name and image.
    pub async fn view(&self, user_id: &str) -> DbResult<Vec<CartLineView>> {
        let lines = sqlx::query_as::<_, CartLineView>(
            r#"
            SELECT
                ci.product_id,
                p.name AS product_name,
                p.image_url,
                ci.unit_price_cents,
                ci.quantity
            FROM cart_items ci
            INNER JOIN products p ON p.id = ci.product_id
            WHERE ci.user_id = ?1
            ORDER BY ci.added_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}
