//! # Repository Module
//!
//! Database repositories for the vendor rollup.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and the ETL stages                      │
//! │                                                                         │
//! │  Job                                                                   │
//! │   │                                                                     │
//! │   │  db.sources(&tables).fetch_snapshot()                              │
//! │   ▼                                                                     │
//! │  SourceRepository          read-only, four SELECTs                     │
//! │  ├── fetch_invoices()                                                  │
//! │  ├── fetch_purchases()                                                 │
//! │  ├── fetch_price_references()                                          │
//! │  └── fetch_sales()                                                     │
//! │                                                                         │
//! │   │  db.summaries(&tables).replace(&rows)                              │
//! │   ▼                                                                     │
//! │  SummaryRepository         destination table only                      │
//! │  ├── replace()             staging table + swap, one transaction       │
//! │  ├── count()                                                           │
//! │  └── fetch_all()                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SourceRepository`](source::SourceRepository) - Extraction of the four source tables
//! - [`SummaryRepository`](summary::SummaryRepository) - Destination table replace and read-back

pub mod source;
pub mod summary;
