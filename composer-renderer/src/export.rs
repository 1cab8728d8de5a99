//! Scene export to PNG.
//!
//! Renders a [`Stage`] through an SVG intermediate representation and the
//! resvg/tiny-skia rasterization pipeline. Overlays named in the export
//! settings are hidden for the duration of a capture and restored afterwards,
//! whether or not the capture succeeds.
//!
//! Text is shaped against a font database built once per exporter from the
//! system fonts plus any configured font directories.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use composer_core::{ExportSettings, ImageRecord, Overlay, OverlayGuard, Scene, TextRecord};
use image::ImageEncoder;

use crate::error::{RenderError, RenderResult};
use crate::image::to_data_uri;

/// Something that can be drawn into an export.
pub trait Stage {
    /// Produce an SVG document covering `(0, 0)..(width, height)` in logical
    /// pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage cannot be rendered.
    fn to_svg(&self, width: u32, height: u32) -> RenderResult<String>;
}

/// The scene paints its own `background` over the whole output, so it takes
/// precedence over [`ExportSettings::background`].
impl Stage for Scene {
    fn to_svg(&self, width: u32, height: u32) -> RenderResult<String> {
        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        );
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&self.background),
        );

        for record in &self.images {
            render_image_svg(&mut svg, record)?;
        }
        for text in &self.texts {
            render_text_svg(&mut svg, text);
        }

        svg.push_str("</svg>");
        Ok(svg)
    }
}

/// Exports a [`Stage`] to PNG.
pub struct SceneExporter {
    config: ExportSettings,
    fontdb: Arc<usvg::fontdb::Database>,
    fallback_family: Option<String>,
}

impl SceneExporter {
    /// Create a new exporter with the given settings.
    ///
    /// Settings are checked when capturing, not here.
    #[must_use]
    pub fn new(config: ExportSettings) -> Self {
        let (fontdb, fallback_family) = build_fontdb(&config);
        Self {
            config,
            fontdb: Arc::new(fontdb),
            fallback_family,
        }
    }

    /// Create an exporter with default settings (960x540, pixel ratio 1).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportSettings::default())
    }

    /// The settings in use.
    #[must_use]
    pub fn config(&self) -> &ExportSettings {
        &self.config
    }

    /// Number of font faces available for text.
    #[must_use]
    pub fn font_face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Output size in device pixels.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn pixel_size(&self) -> (u32, u32) {
        let ratio = self.config.pixel_ratio;
        let w = (self.config.width as f32 * ratio).round() as u32;
        let h = (self.config.height as f32 * ratio).round() as u32;
        (w.max(1), h.max(1))
    }

    /// Capture the stage as PNG bytes with the configured overlays hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are unusable (zero size, non-positive
    /// pixel ratio), or if rendering or encoding fails. Overlays are restored
    /// before the error is returned.
    pub fn capture_png<S: Stage + ?Sized>(
        &self,
        stage: &S,
        overlays: &[&dyn Overlay],
    ) -> RenderResult<Vec<u8>> {
        self.config
            .validate()
            .map_err(|e| RenderError::Export(e.to_string()))?;

        let guard = OverlayGuard::hide(overlays, self.config.hidden_overlays.as_slice());
        tracing::debug!("Capturing stage with {} overlays hidden", guard.hidden_count());

        let svg = stage.to_svg(self.config.width, self.config.height)?;
        let pixmap = self.rasterize(&svg)?;
        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;

        drop(guard);
        Ok(png)
    }

    /// Capture the stage and save it as `<dir>/<file_name>`.
    ///
    /// The PNG is written to a temporary file in `dir` and renamed into place,
    /// so a failed write never leaves a partial file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if capture fails or the file cannot be written.
    pub fn download<S: Stage + ?Sized>(
        &self,
        stage: &S,
        overlays: &[&dyn Overlay],
        dir: &Path,
    ) -> RenderResult<PathBuf> {
        let png = self.capture_png(stage, overlays)?;
        let target = dir.join(&self.config.file_name);

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&png)?;
        tmp.persist(&target).map_err(|e| RenderError::Io(e.error))?;

        tracing::info!("Exported {} bytes to {}", png.len(), target.display());
        Ok(target)
    }

    /// Render the stage to its SVG intermediate at the configured size.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage cannot be rendered.
    pub fn render_to_svg<S: Stage + ?Sized>(&self, stage: &S) -> RenderResult<String> {
        stage.to_svg(self.config.width, self.config.height)
    }

    /// Rasterize an SVG string onto a background-filled pixmap.
    fn rasterize(&self, svg: &str) -> RenderResult<tiny_skia::Pixmap> {
        let mut opt = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        if let Some(family) = &self.fallback_family {
            opt.font_family.clone_from(family);
        }
        let tree = usvg::Tree::from_str(svg, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let (px_w, px_h) = self.pixel_size();
        let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h)
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        let [r, g, b, a] = self.config.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

        let ratio = self.config.pixel_ratio;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(ratio, ratio),
            &mut pixmap.as_mut(),
        );

        Ok(pixmap)
    }
}

impl Default for SceneExporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Load system fonts and `font_dirs`, and pick the family that stands in for
/// uninstalled ones.
fn build_fontdb(config: &ExportSettings) -> (usvg::fontdb::Database, Option<String>) {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }

    let fallback = config.fallback_font_family.clone().or_else(|| {
        db.faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
    });

    match &fallback {
        Some(family) => {
            db.set_serif_family(family.clone());
            db.set_sans_serif_family(family.clone());
            tracing::debug!(
                "Loaded {} font faces, fallback family {}",
                db.len(),
                family
            );
        }
        None => tracing::warn!("No fonts available; text will not be rasterized"),
    }

    (db, fallback)
}

/// Render a single image record to SVG.
///
/// The upload's data URI is embedded as-is only when it holds a format the
/// rasterizer decodes itself. Anything else is re-encoded to PNG from the
/// decoded pixels. Records with neither pixels nor a data URI are skipped.
fn render_image_svg(svg: &mut String, record: &ImageRecord) -> RenderResult<()> {
    let href = if record.source.rgba.is_empty() {
        if record.preview_uri.is_empty() {
            tracing::debug!("Skipping image {} with no pixels", record.id);
            return Ok(());
        }
        record.preview_uri.clone()
    } else if embeds_preview(record) {
        record.preview_uri.clone()
    } else {
        encode_source_png(record)?
    };

    let _ = write!(
        svg,
        "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" href=\"{}\"/>",
        record.x,
        record.y,
        record.width,
        record.height,
        escape_xml(&href),
    );
    Ok(())
}

fn embeds_preview(record: &ImageRecord) -> bool {
    let format = record.source.format;
    format.is_svg_embeddable()
        && record
            .preview_uri
            .strip_prefix("data:")
            .is_some_and(|rest| rest.starts_with(&format!("{};", format.mime())))
}

fn encode_source_png(record: &ImageRecord) -> RenderResult<String> {
    let source = &record.source;
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            &source.rgba,
            source.width,
            source.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Export(format!("Failed to encode image {}: {e}", record.id)))?;
    Ok(to_data_uri("image/png", &buf))
}

/// Render a single text record to SVG. `y` is the top of the text box.
fn render_text_svg(svg: &mut String, text: &TextRecord) {
    let baseline = text.y + text.font_size;
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"{baseline}\" font-size=\"{}\" font-family=\"{}\" fill=\"{}\">{}</text>",
        text.x,
        text.font_size,
        escape_xml(&text.font_family),
        escape_xml(&text.color),
        escape_xml(&text.content),
    );
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
