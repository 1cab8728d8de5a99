//! # Graphic Composer Core
//!
//! Data model and synchronous services for the graphic composition editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                composer-core                │
//! ├─────────────────────────────────────────────┤
//! │  Records          │  Services               │
//! │  - ImageRecord    │  - TextService          │
//! │  - TextRecord     │  - collection ops       │
//! │  - RecordId       │  - IdSequence           │
//! ├─────────────────────────────────────────────┤
//! │  Scene            │  Overlays               │
//! │  - viewport       │  - OverlayHandle        │
//! │  - record lists   │  - OverlayGuard         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Record collections are always owned by the caller. Services only borrow
//! them for the duration of a call.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod collection;
pub mod config;
pub mod error;
pub mod ids;
pub mod overlay;
pub mod record;
pub mod scene;
pub mod text;

pub use config::{ComposerConfig, ExportSettings, ImageDefaults, IngestOrder, TextDefaults};
pub use error::{ComposerError, ComposerResult};
pub use ids::{IdGenerator, IdSequence, RecordId};
pub use overlay::{Overlay, OverlayGuard, OverlayHandle};
pub use record::{ImageFormat, ImageRecord, PixelSource, Record, TextRecord};
pub use scene::Scene;
pub use text::TextService;

/// Composer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
