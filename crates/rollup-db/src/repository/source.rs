//! # Source Repository
//!
//! Reads the four source tables into `rollup-core` records.
//!
//! ## Extraction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  vendor_invoice   "VendorNumber", "Freight"          → InvoiceRecord   │
//! │  purchases        "VendorNumber", "VendorName",      → PurchaseRecord  │
//! │                   "Brand", "Description",                              │
//! │                   "PurchasePrice", "Quantity",                         │
//! │                   "Dollars"                                            │
//! │  purchase_prices  "Brand", "Volume", "Price"         → PriceReference  │
//! │  sales            "VendorNo", "Brand",               → SaleRecord      │
//! │                   "SalesQuantity", "SalesPrice",                       │
//! │                   "SalesDollars", "ExciseTax"                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every selected column is CAST to the type the record expects, so a
//! numeric column loaded as INTEGER in one table and REAL in another decodes
//! the same way. Brand and Volume are read as text: Brand is a join key and
//! Volume is parsed only after the joins.
//!
//! Rows whose group key (vendor number, brand) is NULL are skipped here;
//! they can never match a join and would only form an "unknown" group.
//! Skipped purchase rows are counted by `count_unkeyed_purchases` so the
//! run report can show them.

use sqlx::{AnyPool, Row};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::schema::{columns, TableNames};
use rollup_core::validation::quote_ident;
use rollup_core::{InvoiceRecord, PriceReference, PurchaseRecord, SaleRecord, SourceSnapshot};

/// Repository for the read-only source tables.
#[derive(Debug, Clone)]
pub struct SourceRepository {
    pool: AnyPool,
    tables: TableNames,
}

/// `CAST("Column" AS type) AS alias`
fn cast(column: &str, sql_type: &str, alias: &str) -> String {
    format!("CAST({} AS {}) AS {}", quote_ident(column), sql_type, alias)
}

const INT: &str = "BIGINT";
const FLOAT: &str = "DOUBLE PRECISION";
const TEXT: &str = "TEXT";

impl SourceRepository {
    /// Creates a new SourceRepository.
    pub fn new(pool: AnyPool, tables: TableNames) -> Self {
        SourceRepository { pool, tables }
    }

    /// Reads all four source tables.
    pub async fn fetch_snapshot(&self) -> DbResult<SourceSnapshot> {
        let snapshot = SourceSnapshot {
            invoices: self.fetch_invoices().await?,
            purchases: self.fetch_purchases().await?,
            price_references: self.fetch_price_references().await?,
            sales: self.fetch_sales().await?,
        };

        info!(
            invoices = snapshot.invoices.len(),
            purchases = snapshot.purchases.len(),
            price_references = snapshot.price_references.len(),
            sales = snapshot.sales.len(),
            "Source tables extracted"
        );

        Ok(snapshot)
    }

    /// Reads vendor invoices (vendor number, freight).
    pub async fn fetch_invoices(&self) -> DbResult<Vec<InvoiceRecord>> {
        let sql = format!(
            "SELECT {}, {} FROM {} WHERE {} IS NOT NULL",
            cast(columns::VENDOR_NUMBER, INT, "vendor_number"),
            cast(columns::FREIGHT, FLOAT, "freight"),
            quote_ident(&self.tables.invoices),
            quote_ident(columns::VENDOR_NUMBER),
        );
        debug!(table = %self.tables.invoices, "Extracting invoices");

        let rows = sqlx::query_as::<_, InvoiceRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Reads purchase line items.
    pub async fn fetch_purchases(&self) -> DbResult<Vec<PurchaseRecord>> {
        let sql = format!(
            "SELECT {}, {}, {}, {}, {}, {}, {} FROM {} WHERE {} IS NOT NULL AND {} IS NOT NULL",
            cast(columns::VENDOR_NUMBER, INT, "vendor_number"),
            cast(columns::VENDOR_NAME, TEXT, "vendor_name"),
            cast(columns::BRAND, TEXT, "brand"),
            cast(columns::DESCRIPTION, TEXT, "description"),
            cast(columns::PURCHASE_PRICE, FLOAT, "purchase_price"),
            cast(columns::QUANTITY, FLOAT, "quantity"),
            cast(columns::DOLLARS, FLOAT, "dollars"),
            quote_ident(&self.tables.purchases),
            quote_ident(columns::VENDOR_NUMBER),
            quote_ident(columns::BRAND),
        );
        debug!(table = %self.tables.purchases, "Extracting purchases");

        let rows = sqlx::query_as::<_, PurchaseRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Counts purchase rows skipped by [`Self::fetch_purchases`] because
    /// their vendor number or brand is NULL.
    pub async fn count_unkeyed_purchases(&self) -> DbResult<usize> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM {} WHERE {} IS NULL OR {} IS NULL",
            quote_ident(&self.tables.purchases),
            quote_ident(columns::VENDOR_NUMBER),
            quote_ident(columns::BRAND),
        );

        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        let n: i64 = row.try_get("n")?;
        Ok(n.max(0) as usize)
    }

    /// Reads the brand price reference.
    pub async fn fetch_price_references(&self) -> DbResult<Vec<PriceReference>> {
        let sql = format!(
            "SELECT {}, {}, {} FROM {} WHERE {} IS NOT NULL",
            cast(columns::BRAND, TEXT, "brand"),
            cast(columns::VOLUME, TEXT, "volume"),
            cast(columns::PRICE, FLOAT, "price"),
            quote_ident(&self.tables.purchase_prices),
            quote_ident(columns::BRAND),
        );
        debug!(table = %self.tables.purchase_prices, "Extracting price references");

        let rows = sqlx::query_as::<_, PriceReference>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Reads sales line items.
    pub async fn fetch_sales(&self) -> DbResult<Vec<SaleRecord>> {
        let sql = format!(
            "SELECT {}, {}, {}, {}, {}, {} FROM {} WHERE {} IS NOT NULL AND {} IS NOT NULL",
            cast(columns::VENDOR_NO, INT, "vendor_no"),
            cast(columns::BRAND, TEXT, "brand"),
            cast(columns::SALES_QUANTITY, FLOAT, "sales_quantity"),
            cast(columns::SALES_PRICE, FLOAT, "sales_price"),
            cast(columns::SALES_DOLLARS, FLOAT, "sales_dollars"),
            cast(columns::EXCISE_TAX, FLOAT, "excise_tax"),
            quote_ident(&self.tables.sales),
            quote_ident(columns::VENDOR_NO),
            quote_ident(columns::BRAND),
        );
        debug!(table = %self.tables.sales, "Extracting sales");

        let rows = sqlx::query_as::<_, SaleRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
