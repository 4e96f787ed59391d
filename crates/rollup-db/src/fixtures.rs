//! # Source Table Fixtures
//!
//! DDL and insert helpers for the four source tables.
//!
//! The production source tables are loaded by an upstream CSV import the
//! job does not own. These helpers recreate the same layout so the seed
//! binary can populate a development database and tests can run the whole
//! pipeline against in-memory SQLite.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ vendor_invoice   │ VendorNumber BIGINT, Freight DOUBLE PRECISION        │
//! │ purchases        │ VendorNumber BIGINT, VendorName TEXT, Brand TEXT,    │
//! │                  │ Description TEXT, PurchasePrice, Quantity, Dollars   │
//! │ purchase_prices  │ Brand TEXT, Volume TEXT, Price DOUBLE PRECISION      │
//! │ sales            │ VendorNo BIGINT, Brand TEXT, SalesQuantity,          │
//! │                  │ SalesPrice, SalesDollars, ExciseTax                  │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```

use sqlx::AnyPool;
use tracing::debug;

use crate::error::DbResult;
use crate::schema::{columns, TableNames};
use rollup_core::validation::quote_ident;
use rollup_core::{InvoiceRecord, PriceReference, PurchaseRecord, SaleRecord, SourceSnapshot};

/// Column name and SQL type for each source table, in insert order.
fn invoice_columns() -> [(&'static str, &'static str); 2] {
    [
        (columns::VENDOR_NUMBER, "BIGINT"),
        (columns::FREIGHT, "DOUBLE PRECISION"),
    ]
}

fn purchase_columns() -> [(&'static str, &'static str); 7] {
    [
        (columns::VENDOR_NUMBER, "BIGINT"),
        (columns::VENDOR_NAME, "TEXT"),
        (columns::BRAND, "TEXT"),
        (columns::DESCRIPTION, "TEXT"),
        (columns::PURCHASE_PRICE, "DOUBLE PRECISION"),
        (columns::QUANTITY, "DOUBLE PRECISION"),
        (columns::DOLLARS, "DOUBLE PRECISION"),
    ]
}

fn price_columns() -> [(&'static str, &'static str); 3] {
    [
        (columns::BRAND, "TEXT"),
        (columns::VOLUME, "TEXT"),
        (columns::PRICE, "DOUBLE PRECISION"),
    ]
}

fn sale_columns() -> [(&'static str, &'static str); 6] {
    [
        (columns::VENDOR_NO, "BIGINT"),
        (columns::BRAND, "TEXT"),
        (columns::SALES_QUANTITY, "DOUBLE PRECISION"),
        (columns::SALES_PRICE, "DOUBLE PRECISION"),
        (columns::SALES_DOLLARS, "DOUBLE PRECISION"),
        (columns::EXCISE_TAX, "DOUBLE PRECISION"),
    ]
}

fn create_sql(table: &str, cols: &[(&str, &str)]) -> String {
    let defs: Vec<String> = cols
        .iter()
        .map(|(name, ty)| format!("{} {}", quote_ident(name), ty))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(table),
        defs.join(", ")
    )
}

fn insert_sql(table: &str, cols: &[(&str, &str)]) -> String {
    let names: Vec<String> = cols.iter().map(|(name, _)| quote_ident(name)).collect();
    let params: Vec<String> = (1..=cols.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        params.join(", ")
    )
}

/// Creates the four source tables if they do not exist.
pub async fn create_source_tables(pool: &AnyPool, tables: &TableNames) -> DbResult<()> {
    let ddl = [
        create_sql(&tables.invoices, &invoice_columns()),
        create_sql(&tables.purchases, &purchase_columns()),
        create_sql(&tables.purchase_prices, &price_columns()),
        create_sql(&tables.sales, &sale_columns()),
    ];
    for sql in ddl {
        sqlx::query(&sql).execute(pool).await?;
    }
    debug!("Source tables created");
    Ok(())
}

/// Drops the four source tables.
pub async fn drop_source_tables(pool: &AnyPool, tables: &TableNames) -> DbResult<()> {
    for table in [
        &tables.invoices,
        &tables.purchases,
        &tables.purchase_prices,
        &tables.sales,
    ] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Inserts invoice rows.
pub async fn insert_invoices(
    pool: &AnyPool,
    tables: &TableNames,
    rows: &[InvoiceRecord],
) -> DbResult<()> {
    let sql = insert_sql(&tables.invoices, &invoice_columns());
    let mut tx = pool.begin().await?;
    for row in rows {
        sqlx::query(&sql)
            .bind(row.vendor_number)
            .bind(row.freight)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Inserts purchase rows.
pub async fn insert_purchases(
    pool: &AnyPool,
    tables: &TableNames,
    rows: &[PurchaseRecord],
) -> DbResult<()> {
    let sql = insert_sql(&tables.purchases, &purchase_columns());
    let mut tx = pool.begin().await?;
    for row in rows {
        sqlx::query(&sql)
            .bind(row.vendor_number)
            .bind(row.vendor_name.clone())
            .bind(row.brand.clone())
            .bind(row.description.clone())
            .bind(row.purchase_price)
            .bind(row.quantity)
            .bind(row.dollars)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Inserts price reference rows.
pub async fn insert_price_references(
    pool: &AnyPool,
    tables: &TableNames,
    rows: &[PriceReference],
) -> DbResult<()> {
    let sql = insert_sql(&tables.purchase_prices, &price_columns());
    let mut tx = pool.begin().await?;
    for row in rows {
        sqlx::query(&sql)
            .bind(row.brand.clone())
            .bind(row.volume.clone())
            .bind(row.price)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Inserts sales rows.
pub async fn insert_sales(
    pool: &AnyPool,
    tables: &TableNames,
    rows: &[SaleRecord],
) -> DbResult<()> {
    let sql = insert_sql(&tables.sales, &sale_columns());
    let mut tx = pool.begin().await?;
    for row in rows {
        sqlx::query(&sql)
            .bind(row.vendor_no)
            .bind(row.brand.clone())
            .bind(row.sales_quantity)
            .bind(row.sales_price)
            .bind(row.sales_dollars)
            .bind(row.excise_tax)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Creates the source tables and loads a whole snapshot into them.
pub async fn load_snapshot(
    pool: &AnyPool,
    tables: &TableNames,
    snapshot: &SourceSnapshot,
) -> DbResult<()> {
    create_source_tables(pool, tables).await?;
    insert_invoices(pool, tables, &snapshot.invoices).await?;
    insert_purchases(pool, tables, &snapshot.purchases).await?;
    insert_price_references(pool, tables, &snapshot.price_references).await?;
    insert_sales(pool, tables, &snapshot.sales).await?;
    debug!(rows = snapshot.total_rows(), "Snapshot loaded into source tables");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[test]
    fn test_create_sql() {
        let sql = create_sql("vendor_invoice", &invoice_columns());
        assert_eq!(
            sql,
            r#"CREATE TABLE IF NOT EXISTS "vendor_invoice" ("VendorNumber" BIGINT, "Freight" DOUBLE PRECISION)"#
        );
    }

    #[tokio::test]
    async fn test_load_snapshot_round_trips_through_extraction() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        let tables = TableNames::default();
        let snapshot = SourceSnapshot {
            invoices: vec![InvoiceRecord {
                vendor_number: 1,
                freight: Some(5.0),
            }],
            purchases: vec![],
            price_references: vec![PriceReference {
                brand: "A".to_string(),
                volume: None,
                price: Some(12.0),
            }],
            sales: vec![SaleRecord {
                vendor_no: 1,
                brand: "A".to_string(),
                sales_quantity: Some(8.0),
                sales_price: None,
                sales_dollars: Some(96.0),
                excise_tax: Some(0.79),
            }],
        };

        load_snapshot(db.pool(), &tables, &snapshot).await.unwrap();
        let extracted = db.sources(&tables).fetch_snapshot().await.unwrap();

        assert_eq!(extracted.invoices, snapshot.invoices);
        assert_eq!(extracted.price_references, snapshot.price_references);
        assert_eq!(extracted.sales, snapshot.sales);

        drop_source_tables(db.pool(), &tables).await.unwrap();
        assert!(db.sources(&tables).fetch_sales().await.is_err());
    }
}
