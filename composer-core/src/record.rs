//! Records - the objects placed on a composition.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Anything stored in a caller-owned record collection.
pub trait Record {
    /// The record's identifier.
    fn id(&self) -> &RecordId;
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// WebP image.
    WebP,
    /// GIF image.
    Gif,
    /// BMP image.
    Bmp,
    /// Unknown/other format.
    #[default]
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "webp" => Self::WebP,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            _ => Self::Unknown,
        }
    }

    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/webp" => Self::WebP,
            "image/gif" => Self::Gif,
            "image/bmp" => Self::Bmp,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }

        if data.starts_with(b"BM") {
            return Self::Bmp;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    /// MIME type for this format.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Whether an SVG renderer can draw this format straight from a data URI.
    ///
    /// Only PNG, JPEG, GIF and WebP qualify; anything else has to be
    /// re-encoded before it is embedded.
    #[must_use]
    pub fn is_svg_embeddable(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Gif | Self::WebP)
    }
}

/// Decoded pixels of an uploaded image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelSource {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba: Vec<u8>,
    /// Format the pixels were decoded from.
    pub format: ImageFormat,
}

/// An uploaded image placed on the composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Unique identifier.
    pub id: RecordId,
    /// Decoded pixels. Not serialized; `preview_uri` carries the image.
    #[serde(skip)]
    pub source: Arc<PixelSource>,
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Display width in pixels.
    pub width: f32,
    /// Display height in pixels.
    pub height: f32,
    /// Intrinsic width of the decoded image.
    pub original_width: u32,
    /// Intrinsic height of the decoded image.
    pub original_height: u32,
    /// Data URI of the uploaded bytes.
    pub preview_uri: String,
    /// Name of the uploaded file.
    pub file_name: String,
}

impl Record for ImageRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// A text annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Unique identifier.
    pub id: RecordId,
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font family name.
    pub font_family: String,
    /// Text color as hex.
    pub color: String,
}

impl Record for TextRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_from_extension() {
        assert_eq!(ImageFormat::from_extension("png"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("PNG"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("tiff"), ImageFormat::Unknown);
    }

    #[test]
    fn test_format_detection_from_mime() {
        assert_eq!(ImageFormat::from_mime("image/png"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_mime("IMAGE/JPEG"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_mime("text/plain"), ImageFormat::Unknown);
    }

    #[test]
    fn test_format_detection_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            ImageFormat::Png
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            ImageFormat::Jpeg
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"RIFF\x00\x00\x00\x00WEBP"),
            ImageFormat::WebP
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), ImageFormat::Gif);
        assert_eq!(ImageFormat::from_magic_bytes(b"ab"), ImageFormat::Unknown);
    }

    #[test]
    fn test_svg_embeddable_formats() {
        assert!(ImageFormat::Png.is_svg_embeddable());
        assert!(ImageFormat::Jpeg.is_svg_embeddable());
        assert!(ImageFormat::WebP.is_svg_embeddable());
        assert!(!ImageFormat::Bmp.is_svg_embeddable());
        assert!(!ImageFormat::Unknown.is_svg_embeddable());
    }

    #[test]
    fn test_text_record_round_trips_through_json() {
        let text = TextRecord {
            id: RecordId::from("text-1"),
            x: 1.0,
            y: 2.0,
            content: "hi".to_string(),
            font_size: 24.0,
            font_family: "Arial".to_string(),
            color: "#000000".to_string(),
        };
        let json = serde_json::to_string(&text).expect("serialize");
        let back: TextRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, text);
    }
}
