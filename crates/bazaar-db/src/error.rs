//! Storage-layer error types.
//!
//! Every repository method returns [`DbResult`]. Raw `sqlx::Error` values
//! never leave this crate: the `From` impl below classifies them so the API
//! layer can map constraint violations onto its Conflict/Validation
//! taxonomy without knowing anything about SQLite.

use thiserror::Error;

/// Errors produced by the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// A row the caller expected is not there (guarded UPDATE/DELETE that
    /// affected zero rows, or an id lookup that must succeed).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write. Raised for duplicate emails and
    /// second seller profiles; the API maps it to Conflict.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A foreign key rejected the write, e.g. a product pointing at a
    /// category that does not exist.
    #[error("Invalid reference: {0}")]
    ForeignKeyViolation(String),

    /// Opening the database or acquiring a connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// The statement itself failed (CHECK violation, malformed data).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No free connection within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything sqlx reports that has no better classification.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::UniqueViolation {
                    field: constrained_column(db_err.message()),
                    value: "unknown".to_string(),
                },
                ErrorKind::ForeignKeyViolation => {
                    DbError::ForeignKeyViolation(db_err.message().to_string())
                }
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

/// Pulls `table.column` out of SQLite's
/// "UNIQUE constraint failed: table.column" message. Callers that know the
/// offending value replace the whole error via [`DbError::duplicate`].
fn constrained_column(message: &str) -> String {
    message
        .rsplit("failed: ")
        .next()
        .unwrap_or("unknown")
        .to_string()
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
