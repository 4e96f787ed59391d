//! # Table Layout
//!
//! Names of the source tables, their case-sensitive column names, and the
//! column layout of the destination table.
//!
//! Column names are the ones the upstream CSV loads produce (`VendorNumber`,
//! `SalesDollars`, ...). They are always double-quoted in SQL so PostgreSQL
//! does not fold them to lower case.

use rollup_core::validation::{quote_ident, validate_distinct_tables, validate_table_name};
use rollup_core::{ValidationError, DEFAULT_DESTINATION_TABLE};

// =============================================================================
// Source Tables
// =============================================================================

/// Names of the four source tables and the destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub invoices: String,
    pub purchases: String,
    pub purchase_prices: String,
    pub sales: String,
    pub destination: String,
}

impl Default for TableNames {
    fn default() -> Self {
        TableNames {
            invoices: "vendor_invoice".to_string(),
            purchases: "purchases".to_string(),
            purchase_prices: "purchase_prices".to_string(),
            sales: "sales".to_string(),
            destination: DEFAULT_DESTINATION_TABLE.to_string(),
        }
    }
}

impl TableNames {
    /// Checks every name (including the derived staging table) is a plain
    /// identifier and that no table is used twice.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let staging = self.staging();
        let all = [
            self.invoices.as_str(),
            self.purchases.as_str(),
            self.purchase_prices.as_str(),
            self.sales.as_str(),
            self.destination.as_str(),
            staging.as_str(),
        ];
        for name in all {
            validate_table_name(name)?;
        }
        validate_distinct_tables(&all)
    }

    /// Name of the table the new result is built in before the swap.
    pub fn staging(&self) -> String {
        format!("{}_staging", self.destination)
    }
}

/// Source column names.
pub mod columns {
    pub const VENDOR_NUMBER: &str = "VendorNumber";
    pub const VENDOR_NO: &str = "VendorNo";
    pub const VENDOR_NAME: &str = "VendorName";
    pub const BRAND: &str = "Brand";
    pub const DESCRIPTION: &str = "Description";
    pub const PURCHASE_PRICE: &str = "PurchasePrice";
    pub const QUANTITY: &str = "Quantity";
    pub const DOLLARS: &str = "Dollars";
    pub const FREIGHT: &str = "Freight";
    pub const VOLUME: &str = "Volume";
    pub const PRICE: &str = "Price";
    pub const SALES_QUANTITY: &str = "SalesQuantity";
    pub const SALES_PRICE: &str = "SalesPrice";
    pub const SALES_DOLLARS: &str = "SalesDollars";
    pub const EXCISE_TAX: &str = "ExciseTax";
}

// =============================================================================
// Destination Table
// =============================================================================

/// One column of the destination table.
#[derive(Debug, Clone, Copy)]
pub struct SummaryColumn {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
}

const fn col(name: &'static str, sql_type: &'static str, nullable: bool) -> SummaryColumn {
    SummaryColumn {
        name,
        sql_type,
        nullable,
    }
}

/// Destination columns in table order.
///
/// `DOUBLE PRECISION` and `BIGINT` are understood by both PostgreSQL and
/// SQLite (which maps them to REAL and INTEGER affinity).
pub const SUMMARY_COLUMNS: [SummaryColumn; 18] = [
    col("VendorNumber", "BIGINT", false),
    col("VendorName", "TEXT", true),
    col("Brand", "TEXT", false),
    col("Description", "TEXT", true),
    col("PurchasePrice", "DOUBLE PRECISION", false),
    col("ActualPrice", "DOUBLE PRECISION", false),
    col("Volume", "DOUBLE PRECISION", false),
    col("TotalPurchaseDollars", "DOUBLE PRECISION", false),
    col("TotalPurchaseQuantity", "DOUBLE PRECISION", false),
    col("FreightCost", "DOUBLE PRECISION", false),
    col("TotalSalesPrice", "DOUBLE PRECISION", false),
    col("TotalSalesQuantity", "DOUBLE PRECISION", false),
    col("TotalSalesDollars", "DOUBLE PRECISION", false),
    col("TotalExciseTax", "DOUBLE PRECISION", false),
    col("GrossProfit", "DOUBLE PRECISION", false),
    col("ProfitMargin", "DOUBLE PRECISION", true),
    col("StockTurnover", "DOUBLE PRECISION", true),
    col("SalesToPurchaseRatio", "DOUBLE PRECISION", true),
];

/// `CREATE TABLE` statement for a table with the destination layout.
pub fn create_summary_table_sql(table: &str) -> String {
    let columns: Vec<String> = SUMMARY_COLUMNS
        .iter()
        .map(|c| {
            format!(
                "{} {}{}",
                quote_ident(c.name),
                c.sql_type,
                if c.nullable { "" } else { " NOT NULL" }
            )
        })
        .collect();

    format!(
        "CREATE TABLE {} (\n    {}\n)",
        quote_ident(table),
        columns.join(",\n    ")
    )
}

/// Comma-separated quoted destination column list.
pub fn summary_column_list() -> String {
    SUMMARY_COLUMNS
        .iter()
        .map(|c| quote_ident(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_validate() {
        let tables = TableNames::default();
        assert!(tables.validate().is_ok());
        assert_eq!(tables.staging(), "vendor_cleaned_staging");
    }

    #[test]
    fn test_destination_cannot_overwrite_source() {
        let tables = TableNames {
            destination: "sales".to_string(),
            ..Default::default()
        };
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_long_destination_fails_on_staging_name() {
        let tables = TableNames {
            destination: "d".repeat(60),
            ..Default::default()
        };
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_create_summary_table_sql() {
        let sql = create_summary_table_sql("vendor_cleaned_staging");
        assert!(sql.starts_with("CREATE TABLE \"vendor_cleaned_staging\" ("));
        assert!(sql.contains("\"VendorNumber\" BIGINT NOT NULL"));
        assert!(sql.contains("\"ProfitMargin\" DOUBLE PRECISION,"));
        assert!(sql.contains("\"SalesToPurchaseRatio\" DOUBLE PRECISION\n)"));
    }
}
