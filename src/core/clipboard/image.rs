//! Image blob handling
//!
//! Clipboard images travel through history as self-contained PNG data URIs.
//! The digest identifies pixel content without keeping the raw buffer around.

use std::io::Cursor;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use sha2::{Digest, Sha256};

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::ClipboardImage;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// SHA-256 over dimensions and pixels, hex encoded
pub fn digest(image: &ClipboardImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.width.to_le_bytes());
    hasher.update(image.height.to_le_bytes());
    hasher.update(&image.rgba);
    hex::encode(hasher.finalize())
}

/// Encode RGBA pixels as `data:image/png;base64,...`
pub fn encode_data_uri(image: &ClipboardImage) -> AppResult<String> {
    let buffer = RgbaImage::from_raw(image.width, image.height, image.rgba.clone())
        .ok_or_else(|| {
            AppError::Image(format!(
                "Pixel buffer of {} bytes does not fit {}x{}",
                image.rgba.len(),
                image.width,
                image.height
            ))
        })?;

    let mut png = Vec::new();
    buffer.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(&png)))
}

/// Inverse of [`encode_data_uri`]
pub fn decode_data_uri(uri: &str) -> AppResult<ClipboardImage> {
    let payload = uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or_else(|| AppError::Image("Unsupported image data URI".to_string()))?;

    let png = STANDARD.decode(payload)?;
    let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)?.to_rgba8();
    let (width, height) = decoded.dimensions();

    Ok(ClipboardImage::new(width, height, decoded.into_raw()))
}
