use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the invoice core and the services around it.
///
/// Application glue (`main`, `ui`) wraps these in `anyhow::Error`; the UI
/// turns them into status-bar notices and leaves the form untouched.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Infinity or NaN handed to the words converter.
    #[error("amount {0} is not a finite number")]
    NonFiniteAmount(f64),

    /// The whole-unit part needs a scale word beyond "trillion".
    #[error("amount {amount} exceeds the largest spellable value ({max})")]
    AmountOutOfRange { amount: f64, max: u64 },

    #[error("logo is {size} bytes, the limit is {max} bytes")]
    LogoTooLarge { size: u64, max: u64 },

    #[error("unsupported logo file {path:?}: expected a png, jpeg, gif, bmp or svg image")]
    UnsupportedLogo { path: PathBuf },

    /// The PDF converter could not be started or exited unsuccessfully.
    #[error("failed to export PDF: {0}")]
    Export(String),

    #[error("failed to print {path:?}: {reason}")]
    Print { path: PathBuf, reason: String },

    #[error("invalid invoice draft: {0}")]
    Draft(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
