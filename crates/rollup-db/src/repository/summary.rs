//! # Summary Repository
//!
//! Writes the vendor summary to the destination table.
//!
//! ## Replace Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Destination replace (one transaction)                   │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    DROP TABLE IF EXISTS "vendor_cleaned_staging"                       │
//! │    CREATE TABLE "vendor_cleaned_staging" (18 columns)                  │
//! │    INSERT INTO "vendor_cleaned_staging" VALUES (...), (...), ...       │
//! │    DROP TABLE IF EXISTS "vendor_cleaned"                               │
//! │    ALTER TABLE "vendor_cleaned_staging" RENAME TO "vendor_cleaned"     │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any error before COMMIT rolls everything back: readers keep seeing    │
//! │  the previous table, never an empty or half-written one.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::schema::{create_summary_table_sql, summary_column_list, TableNames, SUMMARY_COLUMNS};
use rollup_core::validation::quote_ident;
use rollup_core::VendorSummaryRow;

/// Rows per multi-row INSERT.
///
/// 400 rows × 18 columns stays well under both PostgreSQL's 65535 and
/// SQLite's 32766 bind-parameter limits.
pub const INSERT_BATCH_ROWS: usize = 400;

/// Repository for the destination table.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    pool: AnyPool,
    tables: TableNames,
}

impl SummaryRepository {
    /// Creates a new SummaryRepository.
    pub fn new(pool: AnyPool, tables: TableNames) -> Self {
        SummaryRepository { pool, tables }
    }

    /// Replaces the destination table with `rows`.
    ///
    /// The table is recreated even when `rows` is empty, so a run over empty
    /// sources leaves an empty destination with the full column layout.
    ///
    /// ## Returns
    /// Number of rows written.
    pub async fn replace(&self, rows: &[VendorSummaryRow]) -> DbResult<u64> {
        let staging = self.tables.staging();
        let destination = &self.tables.destination;

        info!(table = %destination, rows = rows.len(), "Replacing destination table");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(&staging)))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&create_summary_table_sql(&staging))
            .execute(&mut *tx)
            .await?;

        let mut written = 0u64;
        for (batch_no, batch) in rows.chunks(INSERT_BATCH_ROWS).enumerate() {
            let sql = insert_sql(&staging, batch.len());
            let mut query = sqlx::query(&sql);
            for row in batch {
                query = query
                    .bind(row.vendor_number)
                    .bind(row.vendor_name.clone())
                    .bind(row.brand.clone())
                    .bind(row.description.clone())
                    .bind(row.purchase_price)
                    .bind(row.actual_price)
                    .bind(row.volume)
                    .bind(row.total_purchase_dollars)
                    .bind(row.total_purchase_quantity)
                    .bind(row.freight_cost)
                    .bind(row.total_sales_price)
                    .bind(row.total_sales_quantity)
                    .bind(row.total_sales_dollars)
                    .bind(row.total_excise_tax)
                    .bind(row.gross_profit)
                    .bind(row.profit_margin)
                    .bind(row.stock_turnover)
                    .bind(row.sales_to_purchase_ratio);
            }
            let result = query.execute(&mut *tx).await?;
            written += result.rows_affected();
            debug!(batch = batch_no, rows = batch.len(), "Inserted batch");
        }

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(destination)))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!(
            "ALTER TABLE {} RENAME TO {}",
            quote_ident(&staging),
            quote_ident(destination)
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(table = %destination, rows = written, "Destination table replaced");
        Ok(written)
    }

    /// Number of rows currently in the destination table.
    pub async fn count(&self) -> DbResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM {}",
            quote_ident(&self.tables.destination)
        );
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row.try_get("n")?)
    }

    /// Reads the destination table back, in storage order.
    pub async fn fetch_all(&self) -> DbResult<Vec<VendorSummaryRow>> {
        let sql = format!(
            "SELECT {} FROM {}",
            summary_column_list(),
            quote_ident(&self.tables.destination)
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }
}

/// `INSERT INTO t (cols) VALUES ($1, ..., $18), ($19, ...)`
fn insert_sql(table: &str, row_count: usize) -> String {
    let width = SUMMARY_COLUMNS.len();
    let tuples: Vec<String> = (0..row_count)
        .map(|r| {
            let params: Vec<String> = (1..=width).map(|c| format!("${}", r * width + c)).collect();
            format!("({})", params.join(", "))
        })
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        quote_ident(table),
        summary_column_list(),
        tuples.join(", ")
    )
}

fn decode_row(row: &AnyRow) -> DbResult<VendorSummaryRow> {
    Ok(VendorSummaryRow {
        vendor_number: row.try_get("VendorNumber")?,
        vendor_name: row.try_get("VendorName")?,
        brand: row.try_get("Brand")?,
        description: row.try_get("Description")?,
        purchase_price: row.try_get("PurchasePrice")?,
        actual_price: row.try_get("ActualPrice")?,
        volume: row.try_get("Volume")?,
        total_purchase_dollars: row.try_get("TotalPurchaseDollars")?,
        total_purchase_quantity: row.try_get("TotalPurchaseQuantity")?,
        freight_cost: row.try_get("FreightCost")?,
        total_sales_price: row.try_get("TotalSalesPrice")?,
        total_sales_quantity: row.try_get("TotalSalesQuantity")?,
        total_sales_dollars: row.try_get("TotalSalesDollars")?,
        total_excise_tax: row.try_get("TotalExciseTax")?,
        gross_profit: row.try_get("GrossProfit")?,
        profit_margin: row.try_get("ProfitMargin")?,
        stock_turnover: row.try_get("StockTurnover")?,
        sales_to_purchase_ratio: row.try_get("SalesToPurchaseRatio")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn row(vendor_number: i64, brand: &str, dollars: f64) -> VendorSummaryRow {
        VendorSummaryRow {
            vendor_number,
            vendor_name: Some(format!("VENDOR {}", vendor_number)),
            brand: brand.to_string(),
            description: None,
            purchase_price: 5.0,
            actual_price: 12.0,
            volume: 750.0,
            total_purchase_dollars: dollars,
            total_purchase_quantity: 10.0,
            freight_cost: 5.0,
            total_sales_price: 0.0,
            total_sales_quantity: 0.0,
            total_sales_dollars: 0.0,
            total_excise_tax: 0.0,
            gross_profit: -dollars,
            profit_margin: None,
            stock_turnover: Some(0.0),
            sales_to_purchase_ratio: Some(0.0),
        }
    }

    async fn setup() -> (Database, SummaryRepository) {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        let repo = db.summaries(&TableNames::default());
        (db, repo)
    }

    #[test]
    fn test_insert_sql_numbers_parameters_across_rows() {
        let sql = insert_sql("t", 2);
        assert!(sql.starts_with("INSERT INTO \"t\" (\"VendorNumber\", "));
        assert!(sql.contains("($1, $2,"));
        assert!(sql.contains("$18), ($19,"));
        assert!(sql.ends_with("$36)"));
    }

    #[tokio::test]
    async fn test_replace_and_read_back() {
        let (_db, repo) = setup().await;
        let rows = vec![row(1, "A", 100.0), row(2, "B", 50.0)];

        assert_eq!(repo.replace(&rows).await.unwrap(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.fetch_all().await.unwrap(), rows);
    }

    #[tokio::test]
    async fn test_replace_overwrites_previous_contents() {
        let (_db, repo) = setup().await;
        repo.replace(&[row(1, "A", 100.0), row(2, "B", 50.0)])
            .await
            .unwrap();

        repo.replace(&[row(3, "C", 10.0)]).await.unwrap();

        assert_eq!(repo.fetch_all().await.unwrap(), vec![row(3, "C", 10.0)]);
    }

    #[tokio::test]
    async fn test_replace_with_no_rows_leaves_empty_table() {
        let (_db, repo) = setup().await;
        repo.replace(&[row(1, "A", 100.0)]).await.unwrap();

        assert_eq!(repo.replace(&[]).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_spans_multiple_batches() {
        let (_db, repo) = setup().await;
        let rows: Vec<_> = (0..(INSERT_BATCH_ROWS as i64 + 25))
            .map(|v| row(v, "A", 1000.0 - v as f64))
            .collect();

        assert_eq!(repo.replace(&rows).await.unwrap(), rows.len() as u64);
        assert_eq!(repo.count().await.unwrap(), rows.len() as i64);
    }

    #[tokio::test]
    async fn test_rollback_on_insert_failure() {
        let (db, repo) = setup().await;
        let original = vec![row(1, "A", 100.0)];
        repo.replace(&original).await.unwrap();

        // Non-finite floats are rejected by the NOT NULL constraint on
        // SQLite (NaN is stored as NULL), aborting the transaction.
        let mut bad = row(2, "B", 50.0);
        bad.gross_profit = f64::NAN;
        let err = repo.replace(&[row(3, "C", 10.0), bad]).await;

        assert!(err.is_err());
        assert_eq!(repo.fetch_all().await.unwrap(), original);
        let staging_left = sqlx::query(
            "SELECT name FROM sqlite_master WHERE name = 'vendor_cleaned_staging'",
        )
        .fetch_optional(db.pool())
        .await
        .unwrap();
        assert!(staging_left.is_none());
    }
}
