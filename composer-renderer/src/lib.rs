//! # Graphic Composer Renderer
//!
//! Image ingestion and PNG export for the graphic composition editor.
//!
//! ## Pipelines
//!
//! ```text
//! uploads ──► read ──► decode (blocking pool) ──► fit 300x200 ──► ImageRecord
//!
//! Stage ──► SVG ──► usvg/resvg ──► tiny-skia Pixmap ──► PNG bytes / file
//!            ▲
//!            └── overlays hidden by OverlayGuard for the whole capture
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod image;
pub mod ingest;

pub use error::{RenderError, RenderResult};
pub use export::{SceneExporter, Stage};
pub use ingest::{FileSource, ImageService, IngestError, IngestOutcome, UploadedFile};

use composer_core::{ComposerConfig, ComposerResult, IdSequence, TextService};

/// The three editor services, configured from one [`ComposerConfig`].
///
/// Image and text ids come from separate sequences, so the first image is
/// `image-1` and the first text is `text-1`.
pub struct Composer {
    images: ImageService,
    texts: TextService,
    exporter: SceneExporter,
}

impl Composer {
    /// Build the services from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ComposerConfig) -> ComposerResult<Self> {
        config.validate()?;
        let ComposerConfig {
            images,
            text,
            export,
        } = config;

        Ok(Self {
            images: ImageService::with_sequence(IdSequence::new(), images),
            texts: TextService::with_sequence(IdSequence::new(), text),
            exporter: SceneExporter::new(export),
        })
    }

    /// Image ingestion and editing.
    #[must_use]
    pub fn images(&self) -> &ImageService {
        &self.images
    }

    /// Text annotation editing.
    #[must_use]
    pub fn texts(&self) -> &TextService {
        &self.texts
    }

    /// Scene export.
    #[must_use]
    pub fn exporter(&self) -> &SceneExporter {
        &self.exporter
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self {
            images: ImageService::new(),
            texts: TextService::new(),
            exporter: SceneExporter::with_defaults(),
        }
    }
}
