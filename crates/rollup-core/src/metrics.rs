//! # Derived Metrics
//!
//! Profitability metrics computed per summary row.
//!
//! ```text
//! GrossProfit          = TotalSalesDollars - TotalPurchaseDollars
//! ProfitMargin         = GrossProfit / TotalSalesDollars * 100
//! StockTurnover        = TotalSalesQuantity / TotalPurchaseQuantity
//! SalesToPurchaseRatio = TotalSalesDollars / TotalPurchaseDollars
//! ```
//!
//! ## Division Policy
//! A vendor/brand with no sales has `TotalSalesDollars = 0`, so a ratio can
//! legitimately have a zero denominator. Every ratio goes through [`ratio`],
//! which returns `None` (NULL in the destination table) when the denominator
//! is zero or the quotient is not finite. No infinities or NaNs are written.

/// Divides `numerator` by `denominator`, or `None` if the result is undefined.
///
/// ## Example
/// ```rust
/// use rollup_core::metrics::ratio;
///
/// assert_eq!(ratio(8.0, 10.0), Some(0.8));
/// assert_eq!(ratio(8.0, 0.0), None);
/// assert_eq!(ratio(0.0, 0.0), None);
/// ```
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// The four metrics attached to every summary row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub gross_profit: f64,
    pub profit_margin: Option<f64>,
    pub stock_turnover: Option<f64>,
    pub sales_to_purchase_ratio: Option<f64>,
}

impl DerivedMetrics {
    /// Computes the metrics from the row's aggregates.
    pub fn compute(
        total_sales_dollars: f64,
        total_purchase_dollars: f64,
        total_sales_quantity: f64,
        total_purchase_quantity: f64,
    ) -> Self {
        let gross_profit = total_sales_dollars - total_purchase_dollars;

        DerivedMetrics {
            gross_profit,
            profit_margin: ratio(gross_profit, total_sales_dollars).map(|m| m * 100.0),
            stock_turnover: ratio(total_sales_quantity, total_purchase_quantity),
            sales_to_purchase_ratio: ratio(total_sales_dollars, total_purchase_dollars),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_metrics_for_loss_making_brand() {
        // Bought 10 units for $100, sold 8 for $96
        let m = DerivedMetrics::compute(96.0, 100.0, 8.0, 10.0);

        assert!((m.gross_profit - -4.0).abs() < EPS);
        assert!((m.profit_margin.unwrap() - (-4.0 / 96.0 * 100.0)).abs() < EPS);
        assert!((m.stock_turnover.unwrap() - 0.8).abs() < EPS);
        assert!((m.sales_to_purchase_ratio.unwrap() - 0.96).abs() < EPS);
    }

    #[test]
    fn test_no_sales_yields_null_margin() {
        let m = DerivedMetrics::compute(0.0, 250.0, 0.0, 20.0);

        assert_eq!(m.gross_profit, -250.0);
        assert_eq!(m.profit_margin, None);
        assert_eq!(m.stock_turnover, Some(0.0));
        assert_eq!(m.sales_to_purchase_ratio, Some(0.0));
    }

    #[test]
    fn test_zero_purchase_quantity() {
        // Priced rows whose quantities were all NULL or cancel out
        let m = DerivedMetrics::compute(50.0, 0.0, 5.0, 0.0);

        assert_eq!(m.gross_profit, 50.0);
        assert_eq!(m.stock_turnover, None);
        assert_eq!(m.sales_to_purchase_ratio, None);
        assert!((m.profit_margin.unwrap() - 100.0).abs() < EPS);
    }

    #[test]
    fn test_ratio_rejects_overflow() {
        assert_eq!(ratio(f64::MAX, 1e-300), None);
        assert_eq!(ratio(-0.0, 0.0), None);
        assert_eq!(ratio(3.0, -1.5), Some(-2.0));
    }
}
