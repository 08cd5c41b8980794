use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mime::Mime;
use tracing::{debug, warn};

use crate::error::{InvoiceError, Result};
use crate::models::Logo;

fn image_mime(path: &Path) -> Option<Mime> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(mime::IMAGE_PNG),
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "gif" => Some(mime::IMAGE_GIF),
        "bmp" => Some(mime::IMAGE_BMP),
        "svg" => Some(mime::IMAGE_SVG),
        _ => None,
    }
}

/// Read an image file into an embeddable `data:` URL.
///
/// Files above `max_bytes` are rejected before being read.
pub fn load_logo(path: &Path, max_bytes: u64) -> Result<Logo> {
    let mime = image_mime(path).ok_or_else(|| InvoiceError::UnsupportedLogo {
        path: path.to_path_buf(),
    })?;

    let size = fs::metadata(path)?.len();
    if size > max_bytes {
        warn!(path = %path.display(), size, max_bytes, "logo rejected: too large");
        return Err(InvoiceError::LogoTooLarge {
            size,
            max: max_bytes,
        });
    }

    let bytes = fs::read(path)?;
    let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));
    debug!(path = %path.display(), size, %mime, "logo loaded");

    Ok(Logo {
        mime: mime.to_string(),
        data_url,
        size,
    })
}
