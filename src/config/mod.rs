use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::CompanyProfile;

/// Prefix for every environment variable the application reads.
pub const ENV_PREFIX: &str = "INVOICE_";

/// Configuration for the application
///
/// Every field can be set through an `INVOICE_`-prefixed environment
/// variable, e.g. `INVOICE_OUTPUT_DIR=out`, or through a `.env` file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory receiving exported Markdown and PDF files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Markdown to PDF converter binary
    #[serde(default = "default_pdf_converter")]
    pub pdf_converter: String,
    /// Command that receives the exported PDF path as its only argument
    #[serde(default = "default_print_command")]
    pub print_command: String,
    /// Page margin in inches
    #[serde(default = "default_page_margin_in")]
    pub page_margin_in: f64,
    #[serde(default = "default_page_format")]
    pub page_format: String,
    #[serde(default = "default_page_orientation")]
    pub page_orientation: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Word for the whole currency unit in the amount-in-words line
    #[serde(default = "default_currency_unit")]
    pub currency_unit: String,
    #[serde(default = "default_subunit_name")]
    pub subunit_name: String,
    /// Largest accepted logo file in bytes
    #[serde(default = "default_max_logo_bytes")]
    pub max_logo_bytes: u64,
    #[serde(default = "default_company_name")]
    pub company_name: String,
    #[serde(default)]
    pub company_tagline: String,
    #[serde(default)]
    pub company_pan: String,
    #[serde(default)]
    pub company_gst: String,
    /// Pre-filled issuer address of a new invoice
    #[serde(default)]
    pub company_address: String,
    #[serde(default = "default_terms")]
    pub terms: String,
    /// `tracing` filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Log destination while the terminal UI owns the screen
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("invoices")
}

fn default_pdf_converter() -> String {
    "pandoc".to_string()
}

fn default_print_command() -> String {
    "lp".to_string()
}

fn default_page_margin_in() -> f64 {
    0.5
}

fn default_page_format() -> String {
    "a4".to_string()
}

fn default_page_orientation() -> String {
    "portrait".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_currency_unit() -> String {
    "Rupees".to_string()
}

fn default_subunit_name() -> String {
    crate::calc::DEFAULT_SUBUNIT.to_string()
}

fn default_max_logo_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_company_name() -> String {
    "Your Company".to_string()
}

fn default_terms() -> String {
    "Payment is due within 30 days.".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("invoice_maker.log")
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize `INVOICE_*` variables into the Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build a Config from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(vars)?;
        Ok(config)
    }

    /// Issuer details printed on every invoice
    pub fn company_profile(&self) -> CompanyProfile {
        CompanyProfile {
            name: self.company_name.clone(),
            tagline: self.company_tagline.clone(),
            pan: self.company_pan.clone(),
            gst: self.company_gst.clone(),
            terms: self.terms.clone(),
        }
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("invoices"));
        assert_eq!(config.pdf_converter, "pandoc");
        assert_eq!(config.print_command, "lp");
        assert_eq!(config.page_margin_in, 0.5);
        assert_eq!(config.page_format, "a4");
        assert_eq!(config.page_orientation, "portrait");
        assert_eq!(config.subunit_name, "paise");
        assert_eq!(config.currency_unit, "Rupees");
        assert_eq!(config.max_logo_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = Config::from_vars(vars(&[
            ("INVOICE_OUTPUT_DIR", "out"),
            ("INVOICE_SUBUNIT_NAME", "cents"),
            ("INVOICE_CURRENCY_UNIT", "Dollars"),
            ("INVOICE_MAX_LOGO_BYTES", "1024"),
            ("INVOICE_PAGE_MARGIN_IN", "1.25"),
            ("INVOICE_COMPANY_NAME", "Acme Travels"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.subunit_name, "cents");
        assert_eq!(config.currency_unit, "Dollars");
        assert_eq!(config.max_logo_bytes, 1024);
        assert_eq!(config.page_margin_in, 1.25);
        assert_eq!(config.company_profile().name, "Acme Travels");
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let result = Config::from_vars(vars(&[("INVOICE_MAX_LOGO_BYTES", "lots")]));
        assert!(result.is_err());
    }
}
