//! UI overlays that must stay out of exported images.
//!
//! The host UI hands the exporter explicit [`Overlay`] handles instead of the
//! exporter looking elements up itself. [`OverlayGuard`] hides the named
//! overlays and puts each one back to its prior visibility when dropped, so
//! restoration happens on every exit path, including errors and unwinding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A named UI element whose visibility can be toggled.
pub trait Overlay {
    /// Name the overlay is addressed by (e.g. `toolbar`).
    fn name(&self) -> &str;

    /// Whether the overlay is currently shown.
    fn is_visible(&self) -> bool;

    /// Show or hide the overlay.
    fn set_visible(&self, visible: bool);
}

/// Cloneable overlay handle; clones share one visibility flag.
#[derive(Debug, Clone)]
pub struct OverlayHandle {
    name: String,
    visible: Arc<AtomicBool>,
}

impl OverlayHandle {
    /// A visible overlay with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Set the initial visibility.
    #[must_use]
    pub fn with_visible(self, visible: bool) -> Self {
        self.visible.store(visible, Ordering::SeqCst);
        self
    }
}

impl Overlay for OverlayHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }
}

/// Hides overlays for its lifetime and restores them on drop.
pub struct OverlayGuard<'a> {
    hidden: Vec<(&'a dyn Overlay, bool)>,
}

impl<'a> OverlayGuard<'a> {
    /// Hide every overlay in `overlays` whose name is listed in `names`.
    ///
    /// Names with no matching overlay are ignored, as are overlays whose name
    /// is not listed.
    #[must_use]
    pub fn hide<S: AsRef<str>>(overlays: &[&'a dyn Overlay], names: &[S]) -> Self {
        let mut hidden = Vec::new();
        for overlay in overlays {
            if names.iter().any(|n| n.as_ref() == overlay.name()) {
                let was_visible = overlay.is_visible();
                overlay.set_visible(false);
                tracing::debug!("Hid overlay {} (was visible: {was_visible})", overlay.name());
                hidden.push((*overlay, was_visible));
            }
        }
        Self { hidden }
    }

    /// Number of overlays this guard is holding hidden.
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

impl Drop for OverlayGuard<'_> {
    fn drop(&mut self) {
        for (overlay, was_visible) in self.hidden.drain(..).rev() {
            overlay.set_visible(was_visible);
        }
    }
}
