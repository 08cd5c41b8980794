use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{InvoiceError, Result};
use crate::models::InvoiceData;

/// Page settings handed to the PDF converter as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub margin_in: f64,
    pub format: String,
    pub orientation: String,
}

impl PageOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            margin_in: config.page_margin_in,
            format: config.page_format.clone(),
            orientation: config.page_orientation.clone(),
        }
    }

    fn converter_args(&self) -> Vec<String> {
        vec![
            "-V".to_string(),
            format!("geometry:margin={}in", self.margin_in),
            "-V".to_string(),
            format!("papersize={}", self.format),
            "-V".to_string(),
            format!("geometry:{}", self.orientation),
        ]
    }
}

/// Service for writing invoice files in Markdown and PDF format
pub struct InvoiceGenerator {
    output_dir: PathBuf,
    converter: String,
    page: PageOptions,
}

impl InvoiceGenerator {
    pub fn new(output_dir: &Path, converter: &str, page: PageOptions) -> Result<Self> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            converter: converter.to_string(),
            page,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.output_dir,
            &config.pdf_converter,
            PageOptions::from_config(config),
        )
    }

    /// Write the rendered Markdown next to where its PDF will go.
    pub fn write_markdown(&self, data: &InvoiceData, markdown: &str) -> Result<PathBuf> {
        let md_path = self.output_dir.join(format!("{}.md", data.file_stem()));
        let mut file = File::create(&md_path)?;
        file.write_all(markdown.as_bytes())?;
        debug!(path = %md_path.display(), "markdown written");
        Ok(md_path)
    }

    /// Convert a Markdown file to PDF with the configured converter.
    ///
    /// Any PDF already at the target path is removed first. A converter
    /// that cannot start, exits unsuccessfully or produces no file is an
    /// [`InvoiceError::Export`].
    pub async fn export_pdf(&self, md_path: &Path) -> Result<PathBuf> {
        let pdf_path = md_path.with_extension("pdf");
        // A file left by an earlier export must not pass for this one.
        if pdf_path.exists() {
            fs::remove_file(&pdf_path)?;
        }

        let output = Command::new(&self.converter)
            .arg(md_path)
            .arg("-o")
            .arg(&pdf_path)
            .args(self.page.converter_args())
            .output()
            .await
            .map_err(|e| {
                warn!(converter = %self.converter, error = %e, "could not run PDF converter");
                InvoiceError::Export(format!("could not run {}: {}", self.converter, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(converter = %self.converter, status = %output.status, "PDF conversion failed");
            return Err(InvoiceError::Export(format!(
                "{} exited with {}: {}",
                self.converter,
                output.status,
                stderr.trim()
            )));
        }

        if !pdf_path.exists() {
            return Err(InvoiceError::Export(format!(
                "{} produced no file at {}",
                self.converter,
                pdf_path.display()
            )));
        }

        info!(path = %pdf_path.display(), "invoice exported");
        Ok(pdf_path)
    }

    /// Write the Markdown file and convert it to PDF. Returns both paths.
    pub async fn generate_invoice(
        &self,
        data: &InvoiceData,
        markdown: &str,
    ) -> Result<(PathBuf, PathBuf)> {
        let md_path = self.write_markdown(data, markdown)?;
        let pdf_path = self.export_pdf(&md_path).await?;
        Ok((md_path, pdf_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn page() -> PageOptions {
        PageOptions {
            margin_in: 0.5,
            format: "a4".into(),
            orientation: "portrait".into(),
        }
    }

    fn data() -> InvoiceData {
        let mut data = InvoiceData::new("", NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        data.invoice_number = "INV-9".into();
        data
    }

    #[test]
    fn test_converter_args() {
        assert_eq!(
            page().converter_args(),
            vec!["-V", "geometry:margin=0.5in", "-V", "papersize=a4", "-V", "geometry:portrait"]
        );
    }

    #[test]
    fn test_creates_output_dir_and_writes_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let generator = InvoiceGenerator::new(&out, "pandoc", page()).unwrap();

        let md_path = generator.write_markdown(&data(), "# Invoice\n").unwrap();
        assert_eq!(md_path, out.join("invoice-INV-9.md"));
        assert_eq!(fs::read_to_string(md_path).unwrap(), "# Invoice\n");
    }

    #[tokio::test]
    async fn test_missing_converter_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let generator =
            InvoiceGenerator::new(dir.path(), "invoice-maker-no-such-converter", page()).unwrap();

        let err = generator.generate_invoice(&data(), "# Invoice\n").await.unwrap_err();
        assert!(matches!(err, InvoiceError::Export(_)));
        // The Markdown is kept so the user can retry or convert by hand.
        assert!(dir.path().join("invoice-INV-9.md").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_converter_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let generator = InvoiceGenerator::new(dir.path(), "false", page()).unwrap();

        let err = generator.generate_invoice(&data(), "# Invoice\n").await.unwrap_err();
        match err {
            InvoiceError::Export(reason) => assert!(reason.contains("exited with")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_converter_without_output_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let generator = InvoiceGenerator::new(dir.path(), "true", page()).unwrap();

        let err = generator.generate_invoice(&data(), "# Invoice\n").await.unwrap_err();
        match err {
            InvoiceError::Export(reason) => assert!(reason.contains("produced no file")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stale_pdf_does_not_count_as_output() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("invoice-INV-9.pdf");
        fs::write(&stale, b"%PDF-1.4 old").unwrap();
        let generator = InvoiceGenerator::new(dir.path(), "true", page()).unwrap();

        let err = generator.generate_invoice(&data(), "# Invoice\n").await.unwrap_err();
        assert!(matches!(err, InvoiceError::Export(_)));
        assert!(!stale.exists());
    }
}
