use crate::calc::{self, InvoiceTotals};
use crate::config::Config;
use crate::error::Result;
use crate::models::{CompanyProfile, InvoiceData, LineItem};

const PLACEHOLDER: &str = "N/A";
const DEFAULT_DESCRIPTION: &str = "Service";

/// Currency wording and embedding choices for one rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub currency_symbol: String,
    pub currency_unit: String,
    pub subunit_name: String,
    /// Inline the logo's data URL. The terminal preview shows a short
    /// marker instead.
    pub embed_logo: bool,
}

impl RenderOptions {
    pub fn from_config(config: &Config, embed_logo: bool) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            currency_unit: config.currency_unit.clone(),
            subunit_name: config.subunit_name.clone(),
            embed_logo,
        }
    }

    fn money(&self, value: f64) -> String {
        format!("{} {:.2}", self.currency_symbol, value)
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() { PLACEHOLDER } else { value }
}

/// Multi-line text as Markdown hard line breaks.
fn hard_breaks(value: &str) -> String {
    or_placeholder(value)
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("  \n")
}

fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Upper-case the first letter of every word.
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Two Hundred Sixty Eight Rupees Only" for a grand total of 268.
pub fn amount_in_words_line(grand_total: f64, options: &RenderOptions) -> Result<String> {
    let words = calc::amount_to_words_with_subunit(grand_total, &options.subunit_name)?;
    Ok(format!(
        "{} {} Only",
        capitalize_words(&words),
        options.currency_unit
    ))
}

/// Lay out the invoice as Markdown.
///
/// Pure: the same data always yields the same text. Fails only when the
/// grand total cannot be spelled.
pub fn render_markdown(
    data: &InvoiceData,
    company: &CompanyProfile,
    options: &RenderOptions,
) -> Result<String> {
    let totals = data.totals();
    let words = amount_in_words_line(totals.grand_total(), options)?;

    let mut content = String::new();
    render_header(&mut content, data, company, options);
    render_parties(&mut content, data);
    render_items(&mut content, &data.items, options);
    render_summary(&mut content, &totals, options);

    content.push_str(&format!("**Amount in Words:** {}\n\n", words));

    content.push_str("## Terms & Conditions\n\n");
    content.push_str(&format!("{}\n\n", or_placeholder(&company.terms)));
    content.push_str(&format!("**For {}**  \n\nAuthorized Signatory\n\n", company.name));
    content.push_str("---\n\n");
    content.push_str("*This is a computer generated invoice and does not require signature.*\n");

    Ok(content)
}

fn render_header(
    content: &mut String,
    data: &InvoiceData,
    company: &CompanyProfile,
    options: &RenderOptions,
) {
    if let Some(logo) = &data.company_logo {
        if options.embed_logo {
            content.push_str(&format!("![Company Logo]({})\n\n", logo.data_url));
        } else {
            content.push_str(&format!("[logo: {}, {} bytes]\n\n", logo.mime, logo.size));
        }
    }

    content.push_str(&format!("# {}\n", company.name));
    if !company.tagline.trim().is_empty() {
        content.push_str(&format!("*{}*\n", company.tagline));
    }
    content.push('\n');

    if !company.pan.trim().is_empty() {
        content.push_str(&format!("**PAN No:** {}  \n", company.pan));
    }
    if !company.gst.trim().is_empty() {
        content.push_str(&format!("**GST No:** {}  \n", company.gst));
    }
    content.push_str(&format!(
        "**Address:**  \n{}\n\n",
        hard_breaks(&data.company_address)
    ));
    content.push_str("---\n\n");
}

fn render_parties(content: &mut String, data: &InvoiceData) {
    content.push_str("## Invoice Information\n\n");
    content.push_str(&format!("**Invoice No:** {}  \n", or_placeholder(&data.invoice_number)));
    content.push_str(&format!("**Invoice Date:** {}  \n", data.invoice_date.format("%d/%m/%Y")));
    content.push_str(&format!("**Details:** {}\n\n", or_placeholder(&data.invoice_details)));

    content.push_str("## Billing Information\n\n");
    content.push_str(&format!("**Bill To:** {}  \n", or_placeholder(&data.recipient_name)));
    content.push_str(&format!("**Address:**  \n{}  \n", hard_breaks(&data.recipient_address)));
    content.push_str(&format!("**State/Code:** {}  \n", or_placeholder(&data.state_code)));
    content.push_str(&format!(
        "**Place of Delivery:** {}\n\n",
        or_placeholder(&data.place_of_delivery)
    ));
}

fn render_items(content: &mut String, items: &[LineItem], options: &RenderOptions) {
    let symbol = &options.currency_symbol;
    content.push_str("## Items\n\n");
    content.push_str(&format!(
        "| Sl. No | Description | Unit Price ({symbol}) | Qty | Tax Rate | Tax Type | Tax Amount ({symbol}) | Total Amount ({symbol}) |\n"
    ));
    content.push_str("|---:|---|---:|:---:|:---:|:---:|---:|---:|\n");

    for (index, item) in items.iter().enumerate() {
        let description = if item.description.trim().is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            table_cell(&item.description)
        };
        content.push_str(&format!(
            "| {} | {} | {} | {} | {}% | {} | {} | {} |\n",
            index + 1,
            description,
            options.money(item.unit_price),
            item.quantity,
            item.tax_rate,
            item.tax_type,
            options.money(item.line_tax()),
            options.money(item.line_grand_total())
        ));
    }
    content.push('\n');
}

fn render_summary(content: &mut String, totals: &InvoiceTotals, options: &RenderOptions) {
    content.push_str("## Invoice Summary\n\n");
    content.push_str(&format!("**Subtotal:** {}  \n", options.money(totals.subtotal())));
    content.push_str(&format!("**Total Tax:** {}  \n", options.money(totals.total_tax())));
    content.push_str(&format!("**Grand Total:** {}\n\n", options.money(totals.grand_total())));
}
