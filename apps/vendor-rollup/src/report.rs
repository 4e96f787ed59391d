//! # Run Report
//!
//! What a successful run read, dropped and wrote.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use rollup_core::{PurchaseFilterStats, SourceSnapshot};

/// Rows read from each source table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCounts {
    pub invoices: usize,
    pub purchases: usize,
    pub price_references: usize,
    pub sales: usize,
}

impl SourceCounts {
    pub fn of(snapshot: &SourceSnapshot) -> Self {
        SourceCounts {
            invoices: snapshot.invoices.len(),
            purchases: snapshot.purchases.len(),
            price_references: snapshot.price_references.len(),
            sales: snapshot.sales.len(),
        }
    }
}

/// Summary of one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub destination: String,
    pub source_rows: SourceCounts,
    /// Purchase rows that never reached a summary row.
    pub purchases_dropped: PurchaseDrops,
    pub rows_written: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Purchase rows dropped by extraction or the transform, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurchaseDrops {
    /// VendorNumber or Brand NULL; never extracted.
    pub unkeyed: usize,
    /// PurchasePrice zero, negative or NULL.
    pub unpriced: usize,
    /// Brand absent from the price reference.
    pub unreferenced: usize,
}

impl PurchaseDrops {
    pub fn new(unkeyed: usize, stats: PurchaseFilterStats) -> Self {
        PurchaseDrops {
            unkeyed,
            unpriced: stats.unpriced,
            unreferenced: stats.unreferenced,
        }
    }

    pub fn total(&self) -> usize {
        self.unkeyed + self.unpriced + self.unreferenced
    }
}

impl RunReport {
    /// Wall-clock duration of the run in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// The line printed on success.
    pub fn success_message(&self) -> String {
        format!(
            "Cleaned data uploaded to table: {} ({} rows)",
            self.destination, self.rows_written
        )
    }

    /// Emits the report as one structured log event.
    pub fn log(&self) {
        info!(
            run_id = %self.run_id,
            destination = %self.destination,
            invoices = self.source_rows.invoices,
            purchases = self.source_rows.purchases,
            price_references = self.source_rows.price_references,
            sales = self.source_rows.sales,
            unkeyed_purchases = self.purchases_dropped.unkeyed,
            unpriced_purchases = self.purchases_dropped.unpriced,
            unreferenced_purchases = self.purchases_dropped.unreferenced,
            rows_written = self.rows_written,
            duration_ms = self.duration_ms(),
            "Run complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_success_message_and_duration() {
        let started_at = Utc::now();
        let report = RunReport {
            run_id: Uuid::new_v4(),
            destination: "vendor_cleaned".to_string(),
            source_rows: SourceCounts::default(),
            purchases_dropped: PurchaseDrops::default(),
            rows_written: 10692,
            started_at,
            finished_at: started_at + Duration::milliseconds(1500),
        };

        assert_eq!(
            report.success_message(),
            "Cleaned data uploaded to table: vendor_cleaned (10692 rows)"
        );
        assert_eq!(report.duration_ms(), 1500);
    }

    #[test]
    fn test_purchase_drops_include_unkeyed_rows() {
        let stats = PurchaseFilterStats {
            unpriced: 2,
            unreferenced: 1,
        };
        let drops = PurchaseDrops::new(3, stats);

        assert_eq!(drops.unkeyed, 3);
        assert_eq!(drops.unpriced, 2);
        assert_eq!(drops.unreferenced, 1);
        assert_eq!(drops.total(), 6);
    }
}
