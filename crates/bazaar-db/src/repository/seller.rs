//! # Seller Profile Repository
//!
//! Database operations for seller profiles and the approval workflow.
//!
//! Status transitions are decided by the pure state machine in
//! `bazaar_core::seller`; this repository persists them with guarded
//! updates (`WHERE status = <expected>`), so a transition that raced with
//! another admin simply affects zero rows instead of clobbering state.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bazaar_core::{Role, SellerProfile, SellerStatus};

/// A pending application row for the admin review queue, joined with the
/// applicant's email.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingSeller {
    pub id: String,
    pub shop_name: String,
    pub description: String,
    pub user_email: String,
}

/// Repository for seller profile database operations.
#[derive(Debug, Clone)]
pub struct SellerRepository {
    pool: SqlitePool,
}

impl SellerRepository {
    /// Creates a new SellerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SellerRepository { pool }
    }

    /// Inserts a new (Pending) profile.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - The user already has a profile
    pub async fn insert(&self, profile: &SellerProfile) -> DbResult<()> {
        debug!(user_id = %profile.user_id, shop = %profile.shop_name, "Inserting seller profile");

        let result = sqlx::query(
            r#"
            INSERT INTO seller_profiles (
                id, user_id, shop_name, description, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.user_id)
        .bind(&profile.shop_name)
        .bind(&profile.description)
        .bind(profile.status)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match DbError::from(e) {
                DbError::UniqueViolation { .. } => {
                    Err(DbError::duplicate("seller profile", &profile.user_id))
                }
                other => Err(other),
            },
        }
    }

    /// Gets the profile owned by a user, if any.
    pub async fn get_by_user(&self, user_id: &str) -> DbResult<Option<SellerProfile>> {
        let profile = sqlx::query_as::<_, SellerProfile>(
            r#"
            SELECT id, user_id, shop_name, description, status, created_at, updated_at
            FROM seller_profiles
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Gets a profile by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SellerProfile>> {
        let profile = sqlx::query_as::<_, SellerProfile>(
            r#"
            SELECT id, user_id, shop_name, description, status, created_at, updated_at
            FROM seller_profiles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Lists Pending applications for the admin review queue.
    pub async fn list_pending(&self) -> DbResult<Vec<PendingSeller>> {
        let sellers = sqlx::query_as::<_, PendingSeller>(
            r#"
            SELECT s.id, s.shop_name, s.description, u.email AS user_email
            FROM seller_profiles s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.status = ?1
            ORDER BY s.created_at
            "#,
        )
        .bind(SellerStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(sellers)
    }

    /// Approves a Pending profile and grants the Seller role, atomically.
    ///
    /// The status update is guarded on Pending; if the profile was already
    /// decided by a concurrent admin, zero rows are affected and the role
    /// is not granted.
    pub async fn approve(&self, profile_id: &str, user_id: &str) -> DbResult<()> {
        debug!(id = %profile_id, "Approving seller profile");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE seller_profiles
            SET status = ?2, updated_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(profile_id)
        .bind(SellerStatus::Approved)
        .bind(now)
        .bind(SellerStatus::Pending)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(DbError::not_found("Seller profile (pending)", profile_id));
        }

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_roles (user_id, role)
            VALUES (?1, ?2)
            "#,
        )
        .bind(user_id)
        .bind(Role::Seller)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Moves a profile from one status to another, guarded on the expected
    /// current status.
    pub async fn transition(
        &self,
        profile_id: &str,
        from: SellerStatus,
        to: SellerStatus,
    ) -> DbResult<()> {
        debug!(id = %profile_id, ?from, ?to, "Transitioning seller profile");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE seller_profiles
            SET status = ?2, updated_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(profile_id)
        .bind(to)
        .bind(now)
        .bind(from)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                format!("Seller profile ({from:?})"),
                profile_id,
            ));
        }

        Ok(())
    }

    /// Re-submits a Rejected application: refreshes shop name/description
    /// and moves the profile back to Pending.
    pub async fn reapply(
        &self,
        profile_id: &str,
        shop_name: &str,
        description: &str,
    ) -> DbResult<()> {
        debug!(id = %profile_id, "Re-submitting seller application");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE seller_profiles
            SET shop_name = ?2, description = ?3, status = ?4, updated_at = ?5
            WHERE id = ?1 AND status = ?6
            "#,
        )
        .bind(profile_id)
        .bind(shop_name)
        .bind(description)
        .bind(SellerStatus::Pending)
        .bind(now)
        .bind(SellerStatus::Rejected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Seller profile (rejected)", profile_id));
        }

        Ok(())
    }
}
