//! # Domain Types
//!
//! Records read from the source tables and the row written to the
//! destination table.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  SOURCE (read-only snapshot)                                           │
//! │  ┌────────────────┐ ┌────────────────┐ ┌────────────────┐ ┌──────────┐ │
//! │  │ InvoiceRecord  │ │ PurchaseRecord │ │ PriceReference │ │SaleRecord│ │
//! │  │ vendor_number  │ │ vendor_number  │ │ brand          │ │vendor_no │ │
//! │  │ freight        │ │ brand, price   │ │ volume (text)  │ │brand     │ │
//! │  │                │ │ qty, dollars   │ │ price          │ │qty, $    │ │
//! │  └────────────────┘ └────────────────┘ └────────────────┘ └──────────┘ │
//! │           │                  │                 │               │       │
//! │           └──────────────────┴────────┬────────┴───────────────┘       │
//! │                                       ▼                                 │
//! │  DESTINATION                 ┌──────────────────┐                       │
//! │                              │ VendorSummaryRow │                       │
//! │                              └──────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Nullability
//! Source numeric columns are `Option<f64>`: a NULL contributes nothing to a
//! sum, exactly like SQL `SUM`. Identity columns used as join keys
//! (`vendor_number`, `brand`) are non-null; rows with NULL keys are filtered
//! out at extraction because they can never join.

use serde::{Deserialize, Serialize};

// =============================================================================
// Source Records
// =============================================================================

/// One invoice line from `vendor_invoice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceRecord {
    pub vendor_number: i64,
    pub freight: Option<f64>,
}

/// One purchase transaction from `purchases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseRecord {
    pub vendor_number: i64,
    pub vendor_name: Option<String>,
    pub brand: String,
    pub description: Option<String>,
    /// Unit cost paid. Rows with a price of zero or less (free or returned
    /// stock) are excluded from every aggregate.
    pub purchase_price: Option<f64>,
    pub quantity: Option<f64>,
    pub dollars: Option<f64>,
}

/// Per-brand list price and volume from `purchase_prices`.
///
/// `volume` is kept as text: the column is loaded from CSV files and may
/// hold integers, decimals or free text. It is coerced to `f64` after the
/// join, not before, so grouping sees the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PriceReference {
    pub brand: String,
    pub volume: Option<String>,
    pub price: Option<f64>,
}

/// One sale transaction from `sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleRecord {
    pub vendor_no: i64,
    pub brand: String,
    pub sales_quantity: Option<f64>,
    pub sales_price: Option<f64>,
    pub sales_dollars: Option<f64>,
    pub excise_tax: Option<f64>,
}

/// Everything the job reads, pulled once per run.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    pub invoices: Vec<InvoiceRecord>,
    pub purchases: Vec<PurchaseRecord>,
    pub price_references: Vec<PriceReference>,
    pub sales: Vec<SaleRecord>,
}

impl SourceSnapshot {
    /// Total number of source rows across all four tables.
    pub fn total_rows(&self) -> usize {
        self.invoices.len() + self.purchases.len() + self.price_references.len() + self.sales.len()
    }
}

// =============================================================================
// Destination Row
// =============================================================================

/// One row of the materialized vendor performance table.
///
/// ## Null Policy
/// - Numeric aggregates are never null: a missing sales or freight match
///   resolves to `0.0`.
/// - Text columns (`vendor_name`, `description`) stay `None` when the source
///   value was NULL; they are never coerced to a number.
/// - Ratio metrics are `None` when their denominator is zero
///   (see [`crate::metrics`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSummaryRow {
    pub vendor_number: i64,
    pub vendor_name: Option<String>,
    pub brand: String,
    pub description: Option<String>,
    pub purchase_price: f64,
    pub actual_price: f64,
    pub volume: f64,
    pub total_purchase_dollars: f64,
    pub total_purchase_quantity: f64,
    pub freight_cost: f64,
    pub total_sales_price: f64,
    pub total_sales_quantity: f64,
    pub total_sales_dollars: f64,
    pub total_excise_tax: f64,
    pub gross_profit: f64,
    pub profit_margin: Option<f64>,
    pub stock_turnover: Option<f64>,
    pub sales_to_purchase_ratio: Option<f64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(price: Option<f64>) -> PurchaseRecord {
        PurchaseRecord {
            vendor_number: 1,
            vendor_name: Some("ACME".to_string()),
            brand: "A".to_string(),
            description: None,
            purchase_price: price,
            quantity: Some(1.0),
            dollars: Some(1.0),
        }
    }

    #[test]
    fn test_snapshot_total_rows() {
        let snapshot = SourceSnapshot {
            purchases: vec![purchase(Some(1.0)), purchase(Some(2.0))],
            invoices: vec![InvoiceRecord {
                vendor_number: 1,
                freight: Some(5.0),
            }],
            ..Default::default()
        };
        assert_eq!(snapshot.total_rows(), 3);
    }
}
