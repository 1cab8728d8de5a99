//! Composer configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ComposerError, ComposerResult};

/// Name of the toolbar overlay.
pub const TOOLBAR: &str = "toolbar";

/// Name of the canvas header overlay.
pub const CANVAS_HEADER: &str = "canvas-header";

/// Name of the layer panel overlay.
pub const LAYER_PANEL: &str = "layer-panel";

/// Order in which ingested images are appended to the caller's collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestOrder {
    /// Append in the order the files were supplied.
    #[default]
    Input,
    /// Append as soon as each file finishes decoding.
    Completion,
}

/// Defaults for image ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDefaults {
    /// Bounding box width that display sizes are fitted into.
    pub max_width: f32,
    /// Bounding box height that display sizes are fitted into.
    pub max_height: f32,
    /// X position of newly ingested images.
    pub x: f32,
    /// Y position of newly ingested images.
    pub y: f32,
    /// Append order for batch ingestion.
    pub order: IngestOrder,
}

impl Default for ImageDefaults {
    fn default() -> Self {
        Self {
            max_width: 300.0,
            max_height: 200.0,
            x: 100.0,
            y: 100.0,
            order: IngestOrder::Input,
        }
    }
}

/// Defaults for new text annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
    /// Placeholder content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font family name.
    pub font_family: String,
    /// Text color as hex.
    pub color: String,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            x: 200.0,
            y: 200.0,
            content: "Double click to edit".to_string(),
            font_size: 24.0,
            font_family: "Arial".to_string(),
            color: "#000000".to_string(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Output width in logical pixels.
    pub width: u32,
    /// Output height in logical pixels.
    pub height: u32,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f32,
    /// Base fill of the output, as RGBA bytes.
    ///
    /// The stage is drawn over this fill, so a [`crate::Scene`] with an
    /// opaque background covers it entirely. It shows through only where the
    /// stage leaves pixels unpainted (for example `background: "none"`).
    pub background: [u8; 4],
    /// File name used by the download path.
    pub file_name: String,
    /// Overlays hidden while capturing.
    pub hidden_overlays: Vec<String>,
    /// Extra directories scanned for font files, on top of the system fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Family used when a text record's family is not installed.
    ///
    /// When unset, the first family found in the font database is used.
    pub fallback_font_family: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            pixel_ratio: 1.0,
            background: [255, 255, 255, 255],
            file_name: "graphic-composition.png".to_string(),
            hidden_overlays: vec![
                TOOLBAR.to_string(),
                CANVAS_HEADER.to_string(),
                LAYER_PANEL.to_string(),
            ],
            font_dirs: Vec::new(),
            fallback_font_family: None,
        }
    }
}

impl ExportSettings {
    /// Check that the output size is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> ComposerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ComposerError::InvalidConfig(
                "export.width and export.height must be non-zero".to_string(),
            ));
        }
        if !(self.pixel_ratio > 0.0 && self.pixel_ratio.is_finite()) {
            return Err(ComposerError::InvalidConfig(
                "export.pixel_ratio must be a positive number".to_string(),
            ));
        }
        if self.file_name.is_empty() {
            return Err(ComposerError::InvalidConfig(
                "export.file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level composer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Image ingestion defaults.
    pub images: ImageDefaults,
    /// Text annotation defaults.
    pub text: TextDefaults,
    /// Export settings.
    pub export: ExportSettings,
}

impl ComposerConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> ComposerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that sizes and ratios are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> ComposerResult<()> {
        if !(self.images.max_width > 0.0 && self.images.max_height > 0.0) {
            return Err(ComposerError::InvalidConfig(
                "images.max_width and images.max_height must be positive".to_string(),
            ));
        }
        if self.text.font_size <= 0.0 {
            return Err(ComposerError::InvalidConfig(
                "text.font_size must be positive".to_string(),
            ));
        }
        self.export.validate()
    }
}
