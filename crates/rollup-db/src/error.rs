//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  PostgreSQL / SQLite error (sqlx::Error)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds categorization                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RollupError (job binary) ← Adds the stage that failed                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Logged, process exits non-zero                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Host unreachable, wrong port
    /// - Credentials rejected
    /// - Malformed connection URL
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A source table or column the job expects is missing.
    ///
    /// ## When This Occurs
    /// - Table renamed or not loaded yet
    /// - Column name case differs (`vendornumber` vs `"VendorNumber"`)
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A value could not be decoded into the expected Rust type.
    #[error("Decode failed for column {column}: {message}")]
    DecodeFailed { column: String, message: String },

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Returns true for errors raised before any statement could run.
    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_) | DbError::PoolExhausted)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::ColumnNotFound      → DbError::SchemaMismatch
/// sqlx::Error::ColumnDecode        → DbError::DecodeFailed
/// sqlx::Error::Database            → Analyze message for missing table/column
/// sqlx::Error::Io / Tls / Config   → DbError::ConnectionFailed
/// sqlx::Error::PoolTimedOut        → DbError::PoolExhausted
/// Other                            → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnNotFound(column) => {
                DbError::SchemaMismatch(format!("column not found: {}", column))
            }

            sqlx::Error::ColumnDecode { index, source } => DbError::DecodeFailed {
                column: index,
                message: source.to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // PostgreSQL: relation "x" does not exist / column "x" does not exist
                // SQLite: no such table: x / no such column: x
                if msg.contains("does not exist")
                    || msg.contains("no such table")
                    || msg.contains("no such column")
                {
                    DbError::SchemaMismatch(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            sqlx::Error::Tls(e) => DbError::ConnectionFailed(e.to_string()),

            sqlx::Error::Configuration(e) => DbError::ConnectionFailed(e.to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
