//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  PostgreSQL error (sqlx::Error, SQLSTATE)      CoreError (planning)    │
//! │       │                                              │                  │
//! │       ▼                                              ▼                  │
//! │  DbError (this module) ◄─────────── DbError::Domain                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (tlapa-api) ← code + message + status                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## SQLSTATE Mapping
//! ```text
//! 23505 unique_violation       → UniqueViolation     (Conflict)
//! 23503 foreign_key_violation  → ForeignKeyViolation (Validation)
//! 23514 check_violation        → CheckViolation      (Conflict)
//! 55P03 lock_not_available     → LockTimeout         (Internal)
//! 22003 numeric_value_out_of_range → OutOfRange      (Validation)
//! anything else                → QueryFailed         (Internal)
//! ```

use thiserror::Error;
use tlapa_core::{CoreError, ErrorKind};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const LOCK_NOT_AVAILABLE: &str = "55P03";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// A domain outcome decided inside a transaction (stock, missing ids).
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Two concurrent inserts of the same product code
    /// - Any UNIQUE index violation not caught by a pre-check
    #[error("Duplicate value violates unique constraint '{constraint}'")]
    UniqueViolation { constraint: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent category, supplier or user
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (e.g. `stock >= 0`).
    #[error("Check constraint '{constraint}' violated")]
    CheckViolation { constraint: String },

    /// A value does not fit its column (e.g. stock past BIGINT).
    #[error("Value out of range: {message}")]
    OutOfRange { message: String },

    /// `lock_timeout` elapsed while waiting for a row lock.
    #[error("Timed out waiting for a row lock")]
    LockTimeout,

    /// A bulk write touched a different number of rows than planned.
    #[error("{operation} affected {actual} rows, expected {expected}")]
    RowCountMismatch {
        operation: &'static str,
        expected: u64,
        actual: u64,
    },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Fails unless `actual == expected`.
    pub(crate) fn check_rows(operation: &'static str, expected: u64, actual: u64) -> DbResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(DbError::RowCountMismatch {
                operation,
                expected,
                actual,
            })
        }
    }

    /// Classifies this error into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Domain(err) => err.kind(),
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::UniqueViolation { .. } | DbError::CheckViolation { .. } => ErrorKind::Conflict,
            DbError::ForeignKeyViolation { .. } | DbError::OutOfRange { .. } => ErrorKind::Validation,
            DbError::LockTimeout
            | DbError::RowCountMismatch { .. }
            | DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::PoolExhausted
            | DbError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → by SQLSTATE (see module docs)
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                match db_err.code().as_deref() {
                    Some(UNIQUE_VIOLATION) => DbError::UniqueViolation { constraint },
                    Some(FOREIGN_KEY_VIOLATION) => DbError::ForeignKeyViolation {
                        message: db_err.message().to_string(),
                    },
                    Some(CHECK_VIOLATION) => DbError::CheckViolation { constraint },
                    Some(LOCK_NOT_AVAILABLE) => DbError::LockTimeout,
                    Some(NUMERIC_VALUE_OUT_OF_RANGE) => DbError::OutOfRange {
                        message: db_err.message().to_string(),
                    },
                    _ => DbError::QueryFailed(db_err.message().to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<tlapa_core::ValidationError> for DbError {
    fn from(err: tlapa_core::ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
