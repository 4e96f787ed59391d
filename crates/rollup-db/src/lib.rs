//! # rollup-db: Database Layer for the Vendor Rollup
//!
//! This crate provides all database access of the vendor rollup job: reading
//! the four source tables and replacing the destination table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendor Rollup Data Flow                          │
//! │                                                                         │
//! │  vendor-rollup job (extract / load stages)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rollup-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Schema     │  │   │
//! │  │   │   (pool.rs)   │    │               │    │              │  │   │
//! │  │   │               │    │ SourceRepo    │    │ table names  │  │   │
//! │  │   │ AnyPool       │◄───│ SummaryRepo   │    │ column names │  │   │
//! │  │   │ URL building  │    │               │    │ output DDL   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        PostgreSQL (production)  /  SQLite in memory (tests)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection configuration and the pool handle
//! - [`schema`] - Table names, source columns, destination layout
//! - [`repository`] - Source extraction and destination replace
//! - [`fixtures`] - Source table DDL and loaders (seed binary, tests)
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rollup_db::{Database, DbConfig, TableNames};
//!
//! let config = DbConfig::postgres("localhost", 5432, "vendor", "postgres", "secret")?;
//! let db = Database::connect(config).await?;
//! let tables = TableNames::default();
//!
//! let snapshot = db.sources(&tables).fetch_snapshot().await?;
//! // ... transform ...
//! db.summaries(&tables).replace(&rows).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use schema::TableNames;

// Repository re-exports for convenience
pub use repository::source::SourceRepository;
pub use repository::summary::SummaryRepository;
