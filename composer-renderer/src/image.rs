//! Image decoding utilities.
//!
//! Decodes uploaded bytes or data URIs into [`PixelSource`]s and computes the
//! display size an image gets when it is placed on the composition.

use base64::Engine;
use composer_core::{ImageFormat, PixelSource};

use crate::error::{RenderError, RenderResult};

/// Decode an image from raw bytes.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn load_image_from_bytes(data: &[u8]) -> RenderResult<PixelSource> {
    let format = ImageFormat::from_magic_bytes(data);

    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(PixelSource {
        width,
        height,
        rgba: rgba.into_raw(),
        format,
    })
}

/// Decode an image from a data URI.
///
/// Supports formats like: `data:image/png;base64,iVBORw0KGgo...`
///
/// # Errors
///
/// Returns an error if the data URI is malformed or the image cannot be decoded.
pub fn load_image_from_data_uri(uri: &str) -> RenderResult<PixelSource> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    let (metadata, encoded) = uri_data
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    if !metadata.ends_with(";base64") {
        return Err(RenderError::Resource(
            "Only base64 data URIs are supported".to_string(),
        ));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?;

    load_image_from_bytes(&bytes)
}

/// Encode bytes as a base64 data URI with the given MIME type.
#[must_use]
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Fit an intrinsic size into a bounding box, preserving aspect ratio.
///
/// Sizes already inside the box are returned unchanged; images are never
/// scaled up.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_within(width: u32, height: u32, max_width: f32, max_height: f32) -> (f32, f32) {
    let (w, h) = (width as f32, height as f32);
    if w <= max_width && h <= max_height {
        return (w, h);
    }

    let ratio = (max_width / w).min(max_height / h);
    (w * ratio, h * ratio)
}
