//! SQLite pool setup and the [`Database`] handle.
//!
//! The pool runs in WAL mode: reads proceed concurrently while writes
//! serialize on SQLite's single writer. That single-writer property is
//! what the checkout transaction leans on — two checkouts touching the
//! same product row cannot interleave their conditional stock decrements.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::cart::CartRepository;
use crate::repository::category::CategoryRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::seller::SellerRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Pool configuration. [`DbConfig::new`] gives production defaults for a
/// file-backed database; [`DbConfig::in_memory`] gives an isolated database
/// for tests.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database file location, or `:memory:`.
    pub database_path: PathBuf,

    /// Pool size bounds. A handful of connections is plenty: reads fan out,
    /// writes serialize anyway.
    pub max_connections: u32,
    pub min_connections: u32,

    /// How long an `acquire` may wait for a free connection.
    pub connect_timeout: Duration,

    /// How long an idle connection is kept before being dropped.
    pub idle_timeout: Duration,

    /// Apply pending migrations during [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed configuration with defaults. The file (and WAL sidecar)
    /// is created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Isolated in-memory database, migrated on connect. Capped at one
    /// connection: each SQLite `:memory:` connection is its own database,
    /// so a larger pool would hand out empty databases.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared database handle. Clones share the underlying pool, so every
/// request handler can carry its own copy and mint repositories on demand.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            // Readers and the single writer coexist without blocking.
            .journal_mode(SqliteJournalMode::Wal)
            // Survives process crash; a power cut may cost the last commit.
            .synchronous(SqliteSynchronous::Normal)
            // Off by default in SQLite for historical reasons.
            .foreign_keys(true)
            // Writers briefly queue instead of failing with SQLITE_BUSY.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Database pool ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            migrations::run_migrations(&db.pool).await?;
        }

        Ok(db)
    }

    /// The raw pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn sellers(&self) -> SellerRepository {
        SellerRepository::new(self.pool.clone())
    }

    pub fn carts(&self) -> CartRepository {
        CartRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Drains the pool. Outstanding repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// True when the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
