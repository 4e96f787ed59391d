//! # Job Error Types
//!
//! One variant per failure class of a run. Every error is fatal: the job
//! stops, nothing is retried, and the destination table keeps its previous
//! contents because the replace is transactional.
//!
//! ```text
//! ┌──────────────┬───────────────────────────────────────────────────────────┐
//! │ Config       │ unreadable TOML, bad env value, invalid table name         │
//! │ Connection   │ store unreachable, login rejected, pool timeout            │
//! │ Query        │ source table/column missing, undecodable value             │
//! │ Transform    │ non-numeric Volume, non-finite aggregate                   │
//! │ Write        │ staging create / insert / swap failed                      │
//! └──────────────┴───────────────────────────────────────────────────────────┘
//! ```

use rollup_core::{CoreError, ValidationError};
use rollup_db::DbError;
use thiserror::Error;

/// Vendor rollup job errors.
#[derive(Debug, Error)]
pub enum RollupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(#[source] DbError),

    #[error("Query error: {0}")]
    Query(#[source] DbError),

    #[error("Transform error: {0}")]
    Transform(#[from] CoreError),

    #[error("Write error: {0}")]
    Write(#[source] DbError),
}

impl RollupError {
    /// Classifies a failure of the extract stage.
    pub fn extract(err: DbError) -> Self {
        if err.is_connection() {
            RollupError::Connection(err)
        } else {
            RollupError::Query(err)
        }
    }

    /// Classifies a failure of the load stage.
    pub fn load(err: DbError) -> Self {
        if err.is_connection() {
            RollupError::Connection(err)
        } else {
            RollupError::Write(err)
        }
    }

    /// Short name of the failure class, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RollupError::Config(_) => "config",
            RollupError::Connection(_) => "connection",
            RollupError::Query(_) => "query",
            RollupError::Transform(_) => "transform",
            RollupError::Write(_) => "write",
        }
    }
}

impl From<ValidationError> for RollupError {
    fn from(err: ValidationError) -> Self {
        RollupError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for RollupError {
    fn from(err: toml::de::Error) -> Self {
        RollupError::Config(err.to_string())
    }
}

impl From<std::io::Error> for RollupError {
    fn from(err: std::io::Error) -> Self {
        RollupError::Config(err.to_string())
    }
}

/// Result type for job operations.
pub type RollupResult<T> = Result<T, RollupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_classification() {
        let err = RollupError::extract(DbError::SchemaMismatch("no such table: sales".into()));
        assert_eq!(err.kind(), "query");

        let err = RollupError::extract(DbError::PoolExhausted);
        assert_eq!(err.kind(), "connection");
    }

    #[test]
    fn test_load_classification() {
        let err = RollupError::load(DbError::QueryFailed("disk full".into()));
        assert_eq!(err.kind(), "write");
        assert_eq!(err.to_string(), "Write error: Query failed: disk full");
    }

    #[test]
    fn test_validation_is_config_error() {
        let err: RollupError = ValidationError::Required {
            field: "destination".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "config");
    }
}
