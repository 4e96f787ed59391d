//! # Vendor Rollup Transform
//!
//! Turns a [`SourceSnapshot`] into the ordered list of [`VendorSummaryRow`]s.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Summaries      FreightSummary / PurchaseSummary / SalesSummary     │
//! │  2. Combine        two left joins, sort by purchase dollars desc       │
//! │  3. Normalize      Volume text → f64, VendorName trimmed               │
//! │  4. Null-fill      numeric NULL → 0, text NULL stays NULL              │
//! │  5. Metrics        GrossProfit, ProfitMargin, StockTurnover, S/P ratio │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::metrics::DerivedMetrics;
use crate::summary::{
    combine, CombinedRow, FreightSummary, PurchaseFilterStats, PurchaseSummary, SalesSummary,
};
use crate::types::{SourceSnapshot, VendorSummaryRow};

/// The transform output.
#[derive(Debug, Clone, Default)]
pub struct Rollup {
    /// Summary rows, largest purchase dollars first.
    pub rows: Vec<VendorSummaryRow>,
    /// Purchase rows that did not reach the summary.
    pub purchase_filter: PurchaseFilterStats,
}

/// Runs the full transform.
///
/// ## Errors
/// - [`CoreError::InvalidVolume`] if a joined price reference has a Volume
///   that is not a number.
/// - [`CoreError::NonFiniteAggregate`] if a summed column is NaN or infinite.
pub fn build_vendor_summary(snapshot: &SourceSnapshot) -> CoreResult<Rollup> {
    let freight = FreightSummary::from_invoices(&snapshot.invoices);
    let purchases = PurchaseSummary::build(&snapshot.purchases, &snapshot.price_references);
    let sales = SalesSummary::from_sales(&snapshot.sales);

    let rows = combine(&purchases, &sales, &freight)
        .into_iter()
        .map(finalize_row)
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(Rollup {
        rows,
        purchase_filter: purchases.stats(),
    })
}

/// Normalizes, null-fills and enriches one combined row.
fn finalize_row(row: CombinedRow) -> CoreResult<VendorSummaryRow> {
    let CombinedRow {
        key,
        purchases,
        sales,
        freight_cost,
    } = row;

    let volume = match key.volume.as_deref() {
        Some(raw) => parse_volume(raw).ok_or_else(|| CoreError::InvalidVolume {
            vendor_number: key.vendor_number,
            brand: key.brand.clone(),
            value: raw.to_string(),
        })?,
        None => 0.0,
    };

    let sales = sales.unwrap_or_default();
    let freight_cost = freight_cost.unwrap_or(0.0);

    let aggregates = [
        ("TotalPurchaseQuantity", purchases.quantity),
        ("TotalPurchaseDollars", purchases.dollars),
        ("FreightCost", freight_cost),
        ("TotalSalesQuantity", sales.quantity),
        ("TotalSalesPrice", sales.price),
        ("TotalSalesDollars", sales.dollars),
        ("TotalExciseTax", sales.excise_tax),
    ];
    if let Some(&(field, _)) = aggregates.iter().find(|(_, value)| !value.is_finite()) {
        return Err(CoreError::NonFiniteAggregate {
            field,
            vendor_number: key.vendor_number,
            brand: key.brand,
        });
    }

    let metrics = DerivedMetrics::compute(
        sales.dollars,
        purchases.dollars,
        sales.quantity,
        purchases.quantity,
    );

    Ok(VendorSummaryRow {
        vendor_number: key.vendor_number,
        vendor_name: key.vendor_name.map(|name| name.trim().to_string()),
        brand: key.brand,
        description: key.description,
        purchase_price: key.purchase_price.get(),
        actual_price: key.actual_price.map(|p| p.get()).unwrap_or(0.0),
        volume,
        total_purchase_dollars: purchases.dollars,
        total_purchase_quantity: purchases.quantity,
        freight_cost,
        total_sales_price: sales.price,
        total_sales_quantity: sales.quantity,
        total_sales_dollars: sales.dollars,
        total_excise_tax: sales.excise_tax,
        gross_profit: metrics.gross_profit,
        profit_margin: metrics.profit_margin,
        stock_turnover: metrics.stock_turnover,
        sales_to_purchase_ratio: metrics.sales_to_purchase_ratio,
    })
}

/// Coerces a stored Volume to `f64`.
///
/// Blank text counts as missing (`0.0`). Anything else must parse as a
/// finite number: `"750"`, `"750.0"` and `" 1.75 "` are accepted, `"750ml"`,
/// `"NaN"` and `"inf"` are not.
pub fn parse_volume(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InvoiceRecord, PriceReference, PurchaseRecord, SaleRecord};

    const EPS: f64 = 1e-9;

    fn scenario() -> SourceSnapshot {
        SourceSnapshot {
            purchases: vec![PurchaseRecord {
                vendor_number: 1,
                vendor_name: Some("  ACME SPIRITS  ".to_string()),
                brand: "A".to_string(),
                description: Some("Agave Reposado".to_string()),
                purchase_price: Some(5.0),
                quantity: Some(10.0),
                dollars: Some(100.0),
            }],
            price_references: vec![PriceReference {
                brand: "A".to_string(),
                volume: Some("750".to_string()),
                price: Some(12.0),
            }],
            sales: vec![SaleRecord {
                vendor_no: 1,
                brand: "A".to_string(),
                sales_quantity: Some(8.0),
                sales_price: Some(12.0),
                sales_dollars: Some(96.0),
                excise_tax: Some(0.79),
            }],
            invoices: vec![InvoiceRecord {
                vendor_number: 1,
                freight: Some(5.0),
            }],
        }
    }

    #[test]
    fn test_single_vendor_scenario() {
        let rollup = build_vendor_summary(&scenario()).unwrap();
        assert_eq!(rollup.rows.len(), 1);

        let row = &rollup.rows[0];
        assert_eq!(row.vendor_number, 1);
        assert_eq!(row.brand, "A");
        assert_eq!(row.vendor_name.as_deref(), Some("ACME SPIRITS"));
        assert_eq!(row.volume, 750.0);
        assert_eq!(row.actual_price, 12.0);
        assert_eq!(row.total_purchase_quantity, 10.0);
        assert_eq!(row.total_purchase_dollars, 100.0);
        assert_eq!(row.total_sales_quantity, 8.0);
        assert_eq!(row.total_sales_dollars, 96.0);
        assert_eq!(row.freight_cost, 5.0);
        assert!((row.gross_profit - -4.0).abs() < EPS);
        assert!((row.profit_margin.unwrap() - -4.166_666_666_666_667).abs() < 1e-9);
        assert!((row.stock_turnover.unwrap() - 0.8).abs() < EPS);
        assert!((row.sales_to_purchase_ratio.unwrap() - 0.96).abs() < EPS);
    }

    #[test]
    fn test_missing_sales_and_freight_fill_with_zero() {
        let mut snapshot = scenario();
        snapshot.sales.clear();
        snapshot.invoices.clear();

        let row = &build_vendor_summary(&snapshot).unwrap().rows[0];

        assert_eq!(row.total_sales_quantity, 0.0);
        assert_eq!(row.total_sales_dollars, 0.0);
        assert_eq!(row.total_sales_price, 0.0);
        assert_eq!(row.total_excise_tax, 0.0);
        assert_eq!(row.freight_cost, 0.0);
        assert_eq!(row.gross_profit, -100.0);
        assert_eq!(row.profit_margin, None);
        assert_eq!(row.stock_turnover, Some(0.0));
    }

    #[test]
    fn test_null_text_columns_stay_null() {
        let mut snapshot = scenario();
        snapshot.purchases[0].vendor_name = None;
        snapshot.purchases[0].description = None;
        snapshot.price_references[0].volume = None;
        snapshot.price_references[0].price = None;

        let row = &build_vendor_summary(&snapshot).unwrap().rows[0];

        assert_eq!(row.vendor_name, None);
        assert_eq!(row.description, None);
        assert_eq!(row.volume, 0.0);
        assert_eq!(row.actual_price, 0.0);
    }

    #[test]
    fn test_unpriced_only_pair_has_no_row() {
        let mut snapshot = scenario();
        snapshot.purchases[0].purchase_price = Some(0.0);

        let rollup = build_vendor_summary(&snapshot).unwrap();

        assert!(rollup.rows.is_empty());
        assert_eq!(rollup.purchase_filter.unpriced, 1);
    }

    #[test]
    fn test_non_numeric_volume_is_an_error() {
        let mut snapshot = scenario();
        snapshot.price_references[0].volume = Some("750ml".to_string());

        let err = build_vendor_summary(&snapshot).unwrap_err();
        assert!(matches!(err, CoreError::InvalidVolume { vendor_number: 1, .. }));
    }

    #[test]
    fn test_non_finite_aggregate_is_an_error() {
        let mut snapshot = scenario();
        snapshot.sales[0].sales_dollars = Some(f64::INFINITY);

        let err = build_vendor_summary(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NonFiniteAggregate { field: "TotalSalesDollars", .. }
        ));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let mut snapshot = scenario();
        for vendor in 2..40 {
            snapshot.purchases.push(PurchaseRecord {
                vendor_number: vendor,
                vendor_name: Some(format!("V{}", vendor)),
                brand: "A".to_string(),
                description: None,
                purchase_price: Some(1.0),
                quantity: Some(1.0),
                dollars: Some(10.0),
            });
        }

        let first = build_vendor_summary(&snapshot).unwrap().rows;
        let second = build_vendor_summary(&snapshot).unwrap().rows;

        assert_eq!(first, second);
        let vendors: Vec<i64> = first.iter().skip(1).map(|r| r.vendor_number).collect();
        let mut sorted = vendors.clone();
        sorted.sort();
        assert_eq!(vendors, sorted);
    }

    #[test]
    fn test_parse_volume() {
        assert_eq!(parse_volume("750"), Some(750.0));
        assert_eq!(parse_volume("750.0"), Some(750.0));
        assert_eq!(parse_volume(" 1.75 "), Some(1.75));
        assert_eq!(parse_volume(""), Some(0.0));
        assert_eq!(parse_volume("750ml"), None);
        assert_eq!(parse_volume("NaN"), None);
        assert_eq!(parse_volume("inf"), None);
    }
}
