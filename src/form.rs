use chrono::NaiveDate;

use crate::models::{InvoiceData, LineItem, Logo, TaxType};

/// A single field edit on one line item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUpdate {
    Description(String),
    UnitPrice(f64),
    Quantity(u32),
    TaxRate(f64),
    TaxType(TaxType),
}

/// Every edit the invoice form can make.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    SetInvoiceNumber(String),
    SetInvoiceDetails(String),
    SetInvoiceDate(NaiveDate),
    SetRecipientName(String),
    SetRecipientAddress(String),
    SetStateCode(String),
    SetPlaceOfDelivery(String),
    SetCompanyAddress(String),
    SetLogo(Logo),
    RemoveLogo,
    AddItem,
    RemoveItem(u64),
    UpdateItem(u64, ItemUpdate),
}

impl InvoiceData {
    /// Apply one command and return the next state.
    ///
    /// The form always keeps at least one item, so removing the last one is
    /// ignored. Commands naming an unknown item id leave the state as is.
    pub fn apply(mut self, command: FormCommand) -> InvoiceData {
        match command {
            FormCommand::SetInvoiceNumber(value) => self.invoice_number = value,
            FormCommand::SetInvoiceDetails(value) => self.invoice_details = value,
            FormCommand::SetInvoiceDate(date) => self.invoice_date = date,
            FormCommand::SetRecipientName(value) => self.recipient_name = value,
            FormCommand::SetRecipientAddress(value) => self.recipient_address = value,
            FormCommand::SetStateCode(value) => self.state_code = value,
            FormCommand::SetPlaceOfDelivery(value) => self.place_of_delivery = value,
            FormCommand::SetCompanyAddress(value) => self.company_address = value,
            FormCommand::SetLogo(logo) => self.company_logo = Some(logo),
            FormCommand::RemoveLogo => self.company_logo = None,
            FormCommand::AddItem => {
                let id = self.next_item_id;
                self.next_item_id += 1;
                self.items.push(LineItem::new(id));
            }
            FormCommand::RemoveItem(id) => {
                if self.items.len() > 1 {
                    self.items.retain(|item| item.id != id);
                }
            }
            FormCommand::UpdateItem(id, update) => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    match update {
                        ItemUpdate::Description(value) => item.description = value,
                        ItemUpdate::UnitPrice(value) => item.unit_price = value,
                        ItemUpdate::Quantity(value) => item.quantity = value,
                        ItemUpdate::TaxRate(value) => item.tax_rate = value,
                        ItemUpdate::TaxType(value) => item.tax_type = value,
                    }
                }
            }
        }
        self
    }
}

/// Price or rate typed into the form. Anything unparsable counts as 0.
pub fn parse_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Quantity typed into the form. Anything unparsable or below 1 counts as 1.
pub fn parse_quantity(input: &str) -> u32 {
    input.trim().parse::<u32>().ok().filter(|qty| *qty >= 1).unwrap_or(1)
}
