//! # Vendor Rollup
//!
//! Batch ETL job that builds the per-vendor, per-brand performance summary.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         vendor-rollup job                               │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────────────────────────────────────┐   │
//! │  │   config     │   │                  job                         │   │
//! │  │              │──►│  extract  ──►  transform  ──►  load          │   │
//! │  │ TOML + env   │   │  rollup-db     rollup-core     rollup-db     │   │
//! │  └──────────────┘   └───────────────────────┬──────────────────────┘   │
//! │                                             │                          │
//! │                          ┌──────────────────▼───────────────┐          │
//! │                          │   report (RunReport, logged)     │          │
//! │                          └──────────────────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the file format. Environment variables:
//! - `ROLLUP_DB_HOST`, `ROLLUP_DB_PORT`, `ROLLUP_DB_NAME`, `ROLLUP_DB_USER`,
//!   `ROLLUP_DB_PASSWORD` - connection settings
//! - `DATABASE_URL` - full connection URL, wins over the discrete settings
//! - `ROLLUP_DESTINATION_TABLE` - output table name
//! - `VENDOR_ROLLUP_CONFIG` - path of the TOML file
//! - `RUST_LOG` - log filter (default `info`)

pub mod config;
pub mod error;
pub mod job;
pub mod report;

pub use config::RollupConfig;
pub use error::{RollupError, RollupResult};
pub use job::{run, VendorRollupJob};
pub use report::RunReport;
