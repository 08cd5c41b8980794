use serde::Serialize;

use crate::models::LineItem;

/// Invoice-level aggregates. Only [`compute_totals`] builds one, so
/// `grand_total == subtotal + total_tax` holds for every value in existence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InvoiceTotals {
    subtotal: f64,
    total_tax: f64,
    grand_total: f64,
}

impl InvoiceTotals {
    /// Sum of `unit_price × quantity` over all items.
    pub const fn subtotal(&self) -> f64 {
        self.subtotal
    }

    /// Sum of per-line tax over all items.
    pub const fn total_tax(&self) -> f64 {
        self.total_tax
    }

    pub const fn grand_total(&self) -> f64 {
        self.grand_total
    }
}

/// Fold `items` in input order into an [`InvoiceTotals`].
///
/// No rounding happens here; currency precision is a formatting concern.
/// An empty slice yields all zeros.
pub fn compute_totals(items: &[LineItem]) -> InvoiceTotals {
    let (subtotal, total_tax) = items.iter().fold((0.0, 0.0), |(subtotal, tax), item| {
        (subtotal + item.line_total(), tax + item.line_tax())
    });

    InvoiceTotals {
        subtotal,
        total_tax,
        grand_total: subtotal + total_tax,
    }
}
