use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{InvoiceError, Result};

/// Hands exported PDFs to the host's print command (`lp` by default).
pub struct Printer {
    command: String,
}

impl Printer {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }

    pub async fn print(&self, pdf_path: &Path) -> Result<()> {
        let fail = |reason: String| InvoiceError::Print {
            path: PathBuf::from(pdf_path),
            reason,
        };

        if !pdf_path.exists() {
            return Err(fail("file does not exist".to_string()));
        }

        let output = Command::new(&self.command)
            .arg(pdf_path)
            .output()
            .await
            .map_err(|e| fail(format!("could not run {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(command = %self.command, status = %output.status, "print command failed");
            return Err(fail(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        info!(path = %pdf_path.display(), command = %self.command, "invoice sent to printer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(dir: &Path) -> PathBuf {
        let path = dir.join("invoice-draft.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_file_is_not_printed() {
        let dir = tempfile::tempdir().unwrap();
        let err = Printer::new("true")
            .print(&dir.path().join("absent.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceError::Print { .. }));
    }

    #[tokio::test]
    async fn test_missing_command_is_print_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Printer::new("invoice-maker-no-such-printer")
            .print(&pdf(dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceError::Print { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_print() {
        let dir = tempfile::tempdir().unwrap();
        Printer::new("true").print(&pdf(dir.path())).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_print_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Printer::new("false").print(&pdf(dir.path())).await.unwrap_err();
        match err {
            InvoiceError::Print { reason, .. } => assert!(reason.contains("exited with")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
