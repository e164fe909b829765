//! Embedded schema migrations.
//!
//! The SQL files under `migrations/sqlite` are compiled into the binary, so
//! a deployed server needs no migration files on disk. sqlx records applied
//! versions in `_sqlx_migrations` and re-running is a no-op.
//!
//! New schema changes get a new `NNN_description.sql` file; applied files
//! are never edited.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies any migrations the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(
        known = MIGRATOR.migrations.len(),
        "Schema migrations up to date"
    );
    Ok(())
}
