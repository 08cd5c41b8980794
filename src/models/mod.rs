mod invoice;
mod line_item;
mod logo;
mod profile;

pub use invoice::InvoiceData;
pub use line_item::{LineItem, TaxType};
pub use logo::Logo;
pub use profile::CompanyProfile;
