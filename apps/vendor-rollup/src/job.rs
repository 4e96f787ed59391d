//! # Vendor Rollup Job
//!
//! One run of the ETL: extract, transform, load.
//!
//! ## Run Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       VendorRollupJob::run()                            │
//! │                                                                         │
//! │  span "vendor_rollup" { run_id }                                       │
//! │                                                                         │
//! │  1. EXTRACT    SourceRepository::fetch_snapshot()                      │
//! │                  connection lost      → RollupError::Connection        │
//! │                  missing table/column → RollupError::Query             │
//! │                                                                         │
//! │  2. TRANSFORM  rollup_core::build_vendor_summary()                     │
//! │                  bad Volume / NaN sum → RollupError::Transform         │
//! │                                                                         │
//! │  3. LOAD       SummaryRepository::replace()                            │
//! │                  any failure          → RollupError::Write             │
//! │                  (transaction rolled back, old table intact)           │
//! │                                                                         │
//! │  4. REPORT     RunReport { counts, rows_written, timestamps }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::RollupConfig;
use crate::error::{RollupError, RollupResult};
use crate::report::{PurchaseDrops, RunReport, SourceCounts};
use rollup_core::build_vendor_summary;
use rollup_db::{Database, TableNames};

/// The vendor rollup over one database.
#[derive(Debug, Clone)]
pub struct VendorRollupJob {
    db: Database,
    tables: TableNames,
}

impl VendorRollupJob {
    pub fn new(db: Database, tables: TableNames) -> Self {
        VendorRollupJob { db, tables }
    }

    /// Runs the job once under a fresh run id.
    pub async fn run(&self) -> RollupResult<RunReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("vendor_rollup", run_id = %run_id);
        self.execute(run_id).instrument(span).await
    }

    async fn execute(&self, run_id: Uuid) -> RollupResult<RunReport> {
        let started_at = Utc::now();
        info!(destination = %self.tables.destination, "Vendor rollup started");

        // 1. Extract
        let sources = self.db.sources(&self.tables);
        let snapshot = sources.fetch_snapshot().await.map_err(RollupError::extract)?;
        let unkeyed = sources
            .count_unkeyed_purchases()
            .await
            .map_err(RollupError::extract)?;
        if unkeyed > 0 {
            warn!(
                rows = unkeyed,
                "Skipped purchase rows without a vendor number or brand"
            );
        }

        // 2. Transform
        let rollup = build_vendor_summary(&snapshot)?;
        if rollup.purchase_filter.unpriced > 0 {
            warn!(
                rows = rollup.purchase_filter.unpriced,
                "Dropped purchase rows without a positive purchase price"
            );
        }
        if rollup.purchase_filter.unreferenced > 0 {
            debug!(
                rows = rollup.purchase_filter.unreferenced,
                "Purchase rows had no price reference for their brand"
            );
        }
        info!(rows = rollup.rows.len(), "Vendor summary built");

        // 3. Load
        let rows_written = self
            .db
            .summaries(&self.tables)
            .replace(&rollup.rows)
            .await
            .map_err(RollupError::load)?;

        Ok(RunReport {
            run_id,
            destination: self.tables.destination.clone(),
            source_rows: SourceCounts::of(&snapshot),
            purchases_dropped: PurchaseDrops::new(unkeyed, rollup.purchase_filter),
            rows_written,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Connects with `config`, runs the job once and closes the pool.
pub async fn run(config: &RollupConfig) -> RollupResult<RunReport> {
    let db = Database::connect(config.db_config()?)
        .await
        .map_err(RollupError::Connection)?;

    let job = VendorRollupJob::new(db.clone(), config.table_names());
    let result = job.run().await;

    db.close().await;
    result
}

// =============================================================================
// Unit Tests
// =============================================================================
