//! # User Repository
//!
//! Database operations for accounts and role memberships.
//!
//! Role rows live in `user_roles`, one row per (user, role). Buyer is
//! granted at registration, Seller when an admin approves the profile,
//! Admin at bootstrap.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bazaar_core::{Role, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(email = %user.email, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match DbError::from(e) {
                DbError::UniqueViolation { .. } => {
                    Err(DbError::duplicate("email", &user.email))
                }
                other => Err(other),
            },
        }
    }

    /// Gets a user by email (login identity).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, password_hash, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, password_hash, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Grants a role to a user. Idempotent.
    pub async fn add_role(&self, user_id: &str, role: Role) -> DbResult<()> {
        debug!(user_id = %user_id, role = %role, "Granting role");

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_roles (user_id, role)
            VALUES (?1, ?2)
            "#,
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns all roles held by a user.
    pub async fn roles(&self, user_id: &str) -> DbResult<Vec<Role>> {
        let roles = sqlx::query_scalar::<_, Role>(
            r#"
            SELECT role FROM user_roles
            WHERE user_id = ?1
            ORDER BY role
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }
}
