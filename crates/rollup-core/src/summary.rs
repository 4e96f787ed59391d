//! # Summaries and Joins
//!
//! The three group-by passes and the two left joins that combine them.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Summary Pipeline                                  │
//! │                                                                         │
//! │  InvoiceRecord[] ──► FreightSummary   { vendor → freight }             │
//! │                                                     │                   │
//! │  PurchaseRecord[] ─┐                                │                   │
//! │                    ├─► PurchaseSummary              │                   │
//! │  PriceReference[] ─┘   { group key → qty, $ }       │                   │
//! │   (inner join on brand,      │                      │                   │
//! │    price > 0 only)           │                      │                   │
//! │                              ▼                      │                   │
//! │  SaleRecord[] ──► SalesSummary ──LEFT JOIN──► combine ◄──LEFT JOIN─┘    │
//! │                  { (vendor, brand) → totals }       │                   │
//! │                                                     ▼                   │
//! │                                    CombinedRow[] (sorted)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each summary is built once into a hash map; the joins are lookups into
//! those maps, never recomputation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::types::{InvoiceRecord, PriceReference, PurchaseRecord, SaleRecord};

// =============================================================================
// Group Float
// =============================================================================

/// An `f64` usable as part of a group-by key.
///
/// Equality and hashing use the bit pattern after folding `-0.0` into `0.0`
/// and every NaN into one canonical NaN, so values SQL would group together
/// land in the same bucket. Ordering is `f64::total_cmp`.
#[derive(Debug, Clone, Copy)]
pub struct GroupFloat(f64);

impl GroupFloat {
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            GroupFloat(0.0)
        } else if value.is_nan() {
            GroupFloat(f64::NAN)
        } else {
            GroupFloat(value)
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for GroupFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for GroupFloat {}

impl Hash for GroupFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for GroupFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// =============================================================================
// Freight Summary
// =============================================================================

/// Freight summed per vendor.
#[derive(Debug, Clone, Default)]
pub struct FreightSummary {
    by_vendor: HashMap<i64, f64>,
}

impl FreightSummary {
    /// Groups invoices by vendor and sums their freight.
    pub fn from_invoices(invoices: &[InvoiceRecord]) -> Self {
        let mut by_vendor: HashMap<i64, f64> = HashMap::new();
        for invoice in invoices {
            *by_vendor.entry(invoice.vendor_number).or_default() += invoice.freight.unwrap_or(0.0);
        }
        FreightSummary { by_vendor }
    }

    /// Freight for a vendor, or `None` if the vendor has no invoices.
    pub fn freight_cost(&self, vendor_number: i64) -> Option<f64> {
        self.by_vendor.get(&vendor_number).copied()
    }

    pub fn len(&self) -> usize {
        self.by_vendor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_vendor.is_empty()
    }
}

// =============================================================================
// Purchase Summary
// =============================================================================

/// The grouping key of the purchase summary.
///
/// Field order is the deterministic tie-break order of the final output, so
/// the derived `Ord` is relied on by [`combine`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PurchaseGroupKey {
    pub vendor_number: i64,
    pub brand: String,
    pub vendor_name: Option<String>,
    pub description: Option<String>,
    pub purchase_price: GroupFloat,
    /// Raw stored Volume; coerced to a number after the join.
    pub volume: Option<String>,
    pub actual_price: Option<GroupFloat>,
}

/// Summed purchase activity for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PurchaseTotals {
    pub quantity: f64,
    pub dollars: f64,
}

/// Counters describing rows that did not reach the purchase summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurchaseFilterStats {
    /// Rows with a purchase price of zero, less, or NULL.
    pub unpriced: usize,
    /// Priced rows whose brand has no price reference (inner join drop).
    pub unreferenced: usize,
}

/// Purchases joined to their price reference and grouped.
#[derive(Debug, Clone, Default)]
pub struct PurchaseSummary {
    groups: HashMap<PurchaseGroupKey, PurchaseTotals>,
    stats: PurchaseFilterStats,
}

impl PurchaseSummary {
    /// Builds the summary.
    ///
    /// ## Join Semantics
    /// A purchase row joins every price reference with the same brand. A
    /// brand listed twice in `purchase_prices` therefore yields two groups
    /// (or doubles a single group when both references are identical), the
    /// same as an SQL inner join.
    pub fn build(purchases: &[PurchaseRecord], references: &[PriceReference]) -> Self {
        let mut by_brand: HashMap<&str, Vec<&PriceReference>> = HashMap::new();
        for reference in references {
            by_brand.entry(reference.brand.as_str()).or_default().push(reference);
        }

        let mut groups: HashMap<PurchaseGroupKey, PurchaseTotals> = HashMap::new();
        let mut stats = PurchaseFilterStats::default();

        for purchase in purchases {
            let Some(price) = purchase.purchase_price.filter(|p| *p > 0.0) else {
                stats.unpriced += 1;
                continue;
            };

            let Some(matches) = by_brand.get(purchase.brand.as_str()) else {
                stats.unreferenced += 1;
                continue;
            };

            for reference in matches {
                let key = PurchaseGroupKey {
                    vendor_number: purchase.vendor_number,
                    brand: purchase.brand.clone(),
                    vendor_name: purchase.vendor_name.clone(),
                    description: purchase.description.clone(),
                    purchase_price: GroupFloat::new(price),
                    volume: reference.volume.clone(),
                    actual_price: reference.price.map(GroupFloat::new),
                };
                let totals = groups.entry(key).or_default();
                totals.quantity += purchase.quantity.unwrap_or(0.0);
                totals.dollars += purchase.dollars.unwrap_or(0.0);
            }
        }

        PurchaseSummary { groups, stats }
    }

    pub fn stats(&self) -> PurchaseFilterStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PurchaseGroupKey, &PurchaseTotals)> {
        self.groups.iter()
    }
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Summed sales activity for one (vendor, brand).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalesTotals {
    pub quantity: f64,
    pub price: f64,
    pub dollars: f64,
    pub excise_tax: f64,
}

/// Sales grouped by vendor, then brand.
#[derive(Debug, Clone, Default)]
pub struct SalesSummary {
    by_vendor: HashMap<i64, HashMap<String, SalesTotals>>,
}

impl SalesSummary {
    pub fn from_sales(sales: &[SaleRecord]) -> Self {
        let mut by_vendor: HashMap<i64, HashMap<String, SalesTotals>> = HashMap::new();
        for sale in sales {
            let totals = by_vendor
                .entry(sale.vendor_no)
                .or_default()
                .entry(sale.brand.clone())
                .or_default();
            totals.quantity += sale.sales_quantity.unwrap_or(0.0);
            totals.price += sale.sales_price.unwrap_or(0.0);
            totals.dollars += sale.sales_dollars.unwrap_or(0.0);
            totals.excise_tax += sale.excise_tax.unwrap_or(0.0);
        }
        SalesSummary { by_vendor }
    }

    pub fn totals(&self, vendor_number: i64, brand: &str) -> Option<SalesTotals> {
        self.by_vendor.get(&vendor_number)?.get(brand).copied()
    }

    /// Number of (vendor, brand) groups.
    pub fn len(&self) -> usize {
        self.by_vendor.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_vendor.values().all(HashMap::is_empty)
    }
}

// =============================================================================
// Combine
// =============================================================================

/// A purchase group with its left-joined sales and freight.
///
/// `None` means the left join found no match; filling happens later.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub key: PurchaseGroupKey,
    pub purchases: PurchaseTotals,
    pub sales: Option<SalesTotals>,
    pub freight_cost: Option<f64>,
}

/// Left-joins the purchase summary to sales and freight.
///
/// ## Ordering
/// Rows are sorted by total purchase dollars, largest first. Ties are broken
/// by the group key ascending (vendor number, brand, vendor name,
/// description, purchase price, volume, actual price), so the output order
/// does not depend on hash map iteration.
pub fn combine(
    purchases: &PurchaseSummary,
    sales: &SalesSummary,
    freight: &FreightSummary,
) -> Vec<CombinedRow> {
    let mut rows: Vec<CombinedRow> = purchases
        .iter()
        .map(|(key, totals)| CombinedRow {
            key: key.clone(),
            purchases: *totals,
            sales: sales.totals(key.vendor_number, &key.brand),
            freight_cost: freight.freight_cost(key.vendor_number),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.purchases
            .dollars
            .total_cmp(&a.purchases.dollars)
            .then_with(|| a.key.cmp(&b.key))
    });

    rows
}

// =============================================================================
// Unit Tests
// =============================================================================
