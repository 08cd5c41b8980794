use serde::{Deserialize, Serialize};

/// An uploaded company logo, already encoded for embedding in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub mime: String,
    pub data_url: String,
    /// Size of the original file in bytes.
    pub size: u64,
}
