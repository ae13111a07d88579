//! Line-item calculator
//!
//! Pure per-row and aggregate monetary math. Values keep full `f64`
//! precision here; rounding to two decimals happens only when a value is
//! formatted for display.

use crate::LineItem;
use serde::{Deserialize, Serialize};

/// Derived amounts for a single line item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowTotals {
    /// `quantity × unit_price`
    pub subtotal: f64,
    /// `subtotal × discount_rate / 100`
    pub discount_amount: f64,
    /// `subtotal − discount_amount`
    pub taxable_amount: f64,
    /// `taxable_amount × tax_rate / 100`
    pub tax_amount: f64,
    /// `taxable_amount + tax_amount`
    pub line_total: f64,
}

impl RowTotals {
    /// Apply the canonical row formula to one item.
    pub fn of(item: &LineItem) -> Self {
        let subtotal = f64::from(item.quantity) * item.unit_price;
        let discount_amount = subtotal * item.discount_rate / 100.0;
        let taxable_amount = subtotal - discount_amount;
        let tax_amount = taxable_amount * item.tax_rate / 100.0;

        Self {
            subtotal,
            discount_amount,
            taxable_amount,
            tax_amount,
            line_total: taxable_amount + tax_amount,
        }
    }
}

/// Result of running the calculator over a full item list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Per-row totals, index-aligned with the input items
    pub rows: Vec<RowTotals>,
    /// Sum of every `line_total`
    pub grand_total: f64,
}

impl InvoiceTotals {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Compute per-row totals and the grand total.
///
/// An empty item list yields an empty row set and a zero grand total.
pub fn compute(items: &[LineItem]) -> InvoiceTotals {
    let rows: Vec<RowTotals> = items.iter().map(RowTotals::of).collect();
    let grand_total = rows.iter().map(|row| row.line_total).sum();

    InvoiceTotals { rows, grand_total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_widget_example() {
        let item = LineItem::new("Widget", 2, 100.0)
            .with_discount_rate(10.0)
            .with_tax_rate(18.0);
        let row = RowTotals::of(&item);

        assert!((row.subtotal - 200.0).abs() < 1e-9);
        assert!((row.discount_amount - 20.0).abs() < 1e-9);
        assert!((row.taxable_amount - 180.0).abs() < 1e-9);
        assert!((row.tax_amount - 32.4).abs() < 1e-9);
        assert!((row.line_total - 212.4).abs() < 1e-9);
    }

    #[test]
    fn test_empty_items() {
        let totals = compute(&[]);
        assert!(totals.is_empty());
        assert_eq!(totals.grand_total, 0.0);
    }

    #[test]
    fn test_rates_are_not_clamped() {
        let item = LineItem::new("Refund", 1, 50.0).with_discount_rate(150.0);
        let row = RowTotals::of(&item);
        assert!((row.line_total - -25.0).abs() < 1e-9);
    }

    #[test]
    fn test_grand_total_accumulates_full_precision() {
        // Rounding each row to 0.11 first would give 0.33.
        let items: Vec<LineItem> = (0..3)
            .map(|_| LineItem::new("Pen", 1, 0.10).with_tax_rate(5.0))
            .collect();
        let totals = compute(&items);
        assert!((totals.grand_total - 0.315).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_line_total_matches_closed_form(
            quantity in 0u32..10_000,
            unit_price in 0.0f64..100_000.0,
            discount_rate in 0.0f64..100.0,
            tax_rate in 0.0f64..100.0,
        ) {
            let item = LineItem::new("x", quantity, unit_price)
                .with_discount_rate(discount_rate)
                .with_tax_rate(tax_rate);
            let expected = f64::from(quantity)
                * unit_price
                * (1.0 - discount_rate / 100.0)
                * (1.0 + tax_rate / 100.0);
            let actual = RowTotals::of(&item).line_total;
            let tolerance = 1e-6 * expected.abs().max(1.0);
            prop_assert!((actual - expected).abs() <= tolerance);
        }

        #[test]
        fn prop_grand_total_is_sum_of_rows(
            items in prop::collection::vec(
                (0u32..500, 0.0f64..5_000.0, 0.0f64..100.0, 0.0f64..100.0),
                0..40,
            )
        ) {
            let items: Vec<LineItem> = items
                .into_iter()
                .map(|(q, p, d, t)| LineItem::new("x", q, p).with_discount_rate(d).with_tax_rate(t))
                .collect();
            let totals = compute(&items);
            let sum: f64 = totals.rows.iter().map(|r| r.line_total).sum();
            prop_assert_eq!(totals.rows.len(), items.len());
            prop_assert!((totals.grand_total - sum).abs() < 1e-6);
        }
    }
}
