use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::calc::{self, InvoiceTotals};
use crate::error::Result;
use crate::models::{LineItem, Logo};

/// Everything the invoice form holds.
///
/// Single owner, updated only through [`InvoiceData::apply`]. Totals are not
/// stored here; [`InvoiceData::totals`] derives them from `items` on every
/// call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvoiceData {
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub invoice_details: String,
    #[serde(default = "today")]
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_address: String,
    #[serde(default)]
    pub state_code: String,
    #[serde(default)]
    pub place_of_delivery: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    pub company_logo: Option<Logo>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(skip)]
    pub(crate) next_item_id: u64,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl InvoiceData {
    /// A blank form dated `invoice_date` with a single default item.
    pub fn new(company_address: impl Into<String>, invoice_date: NaiveDate) -> Self {
        Self {
            invoice_number: String::new(),
            invoice_details: String::new(),
            invoice_date,
            recipient_name: String::new(),
            recipient_address: String::new(),
            state_code: String::new(),
            place_of_delivery: String::new(),
            company_address: company_address.into(),
            company_logo: None,
            items: vec![LineItem::new(1)],
            next_item_id: 2,
        }
    }

    /// Parse a JSON draft. The draft is input only; nothing writes it back.
    ///
    /// A draft without items gets the default row so the form keeps its
    /// one-row minimum.
    pub fn from_draft_json(json: &str) -> Result<Self> {
        let mut data: InvoiceData = serde_json::from_str(json)?;
        if data.items.is_empty() {
            data.items.push(LineItem::new(1));
        }
        data.next_item_id = data.items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        Ok(data)
    }

    pub fn totals(&self) -> InvoiceTotals {
        calc::compute_totals(&self.items)
    }

    pub fn item(&self, id: u64) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Base name shared by the exported Markdown and PDF files.
    pub fn file_stem(&self) -> String {
        let number = self.invoice_number.trim();
        if number.is_empty() {
            "invoice-draft".to_string()
        } else {
            let safe: String = number
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
                .collect();
            format!("invoice-{}", safe)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaxType;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    #[test]
    fn test_new_form_has_one_default_item() {
        let data = InvoiceData::new("Head Office", date());
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.items[0].quantity, 1);
        assert_eq!(data.items[0].tax_rate, 9.0);
        assert_eq!(data.items[0].tax_type, TaxType::Cgst);
        assert_eq!(data.company_address, "Head Office");
        assert_eq!(data.totals().grand_total(), 0.0);
    }

    #[test]
    fn test_draft_json_sets_next_item_id() {
        let json = r#"{
            "invoice_number": "INV-7",
            "invoice_date": "2024-04-01",
            "items": [
                {"id": 4, "description": "Ticket", "unit_price": 100.0, "quantity": 2, "tax_rate": 9.0, "tax_type": "CGST"},
                {"id": 9, "unit_price": 50.0, "quantity": 1, "tax_rate": 0.0, "tax_type": "IGST"}
            ]
        }"#;
        let data = InvoiceData::from_draft_json(json).unwrap();
        assert_eq!(data.next_item_id, 10);
        assert_eq!(data.invoice_date, date());
        assert_eq!(data.totals().grand_total(), 268.0);
    }

    #[test]
    fn test_empty_draft_gets_default_item() {
        let data = InvoiceData::from_draft_json("{}").unwrap();
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.next_item_id, 2);
    }

    #[test]
    fn test_malformed_draft_is_rejected() {
        let err = InvoiceData::from_draft_json("{\"items\": 3}").unwrap_err();
        assert!(matches!(err, crate::error::InvoiceError::Draft(_)));
    }

    #[test]
    fn test_file_stem() {
        let mut data = InvoiceData::new("", date());
        assert_eq!(data.file_stem(), "invoice-draft");
        data.invoice_number = "INV/2024 01".to_string();
        assert_eq!(data.file_stem(), "invoice-INV_2024_01");
    }
}
