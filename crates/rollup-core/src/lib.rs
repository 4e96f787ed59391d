//! # rollup-core: Pure Transform Logic for the Vendor Rollup
//!
//! This crate holds the whole "T" of the vendor rollup ETL job as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Vendor Rollup Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    vendor-rollup (job binary)                   │   │
//! │  │        config ──► connect ──► extract ──► transform ──► load    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rollup-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  summary  │  │  metrics  │  │ validation│  │   │
//! │  │   │  records  │  │  group-by │  │  ratios   │  │ table ids │  │   │
//! │  │   │  rows     │  │  joins    │  │  policy   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  rollup-db (Database Layer)                     │   │
//! │  │            source extraction, destination table swap            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Source records and the summary row
//! - [`summary`] - Freight / purchase / sales summaries and the joins
//! - [`metrics`] - Derived profitability metrics and the division policy
//! - [`rollup`] - The end-to-end transform
//! - [`validation`] - Identifier checks for configured table names
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rollup_core::{build_vendor_summary, InvoiceRecord, PriceReference, PurchaseRecord, SourceSnapshot};
//!
//! let snapshot = SourceSnapshot {
//!     purchases: vec![PurchaseRecord {
//!         vendor_number: 1,
//!         vendor_name: Some("ACME".to_string()),
//!         brand: "A".to_string(),
//!         description: None,
//!         purchase_price: Some(5.0),
//!         quantity: Some(10.0),
//!         dollars: Some(100.0),
//!     }],
//!     price_references: vec![PriceReference {
//!         brand: "A".to_string(),
//!         volume: Some("750".to_string()),
//!         price: Some(12.0),
//!     }],
//!     invoices: vec![InvoiceRecord { vendor_number: 1, freight: Some(5.0) }],
//!     sales: vec![],
//! };
//!
//! let rollup = build_vendor_summary(&snapshot).unwrap();
//! assert_eq!(rollup.rows[0].freight_cost, 5.0);
//! assert_eq!(rollup.rows[0].profit_margin, None); // no sales
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod metrics;
pub mod rollup;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use metrics::DerivedMetrics;
pub use rollup::{build_vendor_summary, Rollup};
pub use summary::PurchaseFilterStats;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default name of the materialized output table.
pub const DEFAULT_DESTINATION_TABLE: &str = "vendor_cleaned";
