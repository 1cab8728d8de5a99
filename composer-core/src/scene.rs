//! The composition being edited.

use serde::{Deserialize, Serialize};

use crate::{ComposerError, ComposerResult, ImageRecord, TextRecord};

/// A composition: viewport plus the caller-owned record collections.
///
/// Images are drawn first, in collection order, then text on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Viewport width in pixels.
    pub viewport_width: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
    /// Background color as hex.
    pub background: String,
    /// Image records, bottom to top.
    pub images: Vec<ImageRecord>,
    /// Text records, bottom to top.
    pub texts: Vec<TextRecord>,
}

impl Scene {
    /// Create a new empty scene with the given viewport size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            background: "#ffffff".to_string(),
            images: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Total number of records in the scene.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.images.len() + self.texts.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.texts.is_empty()
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ComposerResult<String> {
        serde_json::to_string(self).map_err(ComposerError::Serialization)
    }

    /// Deserialize a scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> ComposerResult<Self> {
        serde_json::from_str(json).map_err(ComposerError::Serialization)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(960.0, 540.0)
    }
}
