use std::fmt;

use serde::{Deserialize, Serialize};

/// Tax heading printed next to a line. Descriptive only: every type is
/// computed the same way from `tax_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxType {
    #[default]
    Cgst,
    Sgst,
    Igst,
}

impl TaxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxType::Cgst => "CGST",
            TaxType::Sgst => "SGST",
            TaxType::Igst => "IGST",
        }
    }

    /// Cycle used by the form's tax type selector.
    pub fn next(self) -> Self {
        match self {
            TaxType::Cgst => TaxType::Sgst,
            TaxType::Sgst => TaxType::Igst,
            TaxType::Igst => TaxType::Cgst,
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One billable row of an invoice.
///
/// Per-line figures are derived on demand and never cached on the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u64,
    #[serde(default)]
    pub description: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub tax_rate: f64,
    #[serde(default)]
    pub tax_type: TaxType,
}

impl LineItem {
    /// Default row the form inserts: one unit at 9% CGST.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            description: String::new(),
            unit_price: 0.0,
            quantity: 1,
            tax_rate: 9.0,
            tax_type: TaxType::Cgst,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    pub fn line_tax(&self) -> f64 {
        self.line_total() * self.tax_rate / 100.0
    }

    pub fn line_grand_total(&self) -> f64 {
        self.line_total() + self.line_tax()
    }
}
