//! Text annotation service.

use crate::collection;
use crate::config::TextDefaults;
use crate::{IdGenerator, IdSequence, RecordId, TextRecord};

/// Identifier prefix for text records.
pub const TEXT_ID_PREFIX: &str = "text";

/// Creates and edits [`TextRecord`]s held in caller-owned collections.
#[derive(Debug, Clone)]
pub struct TextService {
    ids: IdGenerator,
    defaults: TextDefaults,
}

#[allow(clippy::unused_self)]
impl TextService {
    /// Service with default styling and its own id sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sequence(IdSequence::new(), TextDefaults::default())
    }

    /// Service drawing ids from an injected sequence.
    #[must_use]
    pub fn with_sequence(sequence: IdSequence, defaults: TextDefaults) -> Self {
        Self {
            ids: IdGenerator::with_sequence(TEXT_ID_PREFIX, sequence),
            defaults,
        }
    }

    /// Create a text record, using the defaults for anything not supplied.
    #[must_use]
    pub fn create_text(
        &self,
        position: Option<(f32, f32)>,
        content: Option<String>,
    ) -> TextRecord {
        let (x, y) = position.unwrap_or((self.defaults.x, self.defaults.y));
        let record = TextRecord {
            id: self.ids.next_id(),
            x,
            y,
            content: content.unwrap_or_else(|| self.defaults.content.clone()),
            font_size: self.defaults.font_size,
            font_family: self.defaults.font_family.clone(),
            color: self.defaults.color.clone(),
        };
        tracing::debug!("Created text {} at ({x}, {y})", record.id);
        record
    }

    /// Create a text record entirely from defaults.
    #[must_use]
    pub fn create_default_text(&self) -> TextRecord {
        self.create_text(None, None)
    }

    /// Look up a text record.
    #[must_use]
    pub fn find_text<'a>(
        &self,
        id: &RecordId,
        texts: &'a [TextRecord],
    ) -> Option<&'a TextRecord> {
        collection::find(texts, id)
    }

    /// Move a text record. Returns `false` if `id` is absent.
    pub fn update_text_position(
        &self,
        id: &RecordId,
        x: f32,
        y: f32,
        texts: &mut [TextRecord],
    ) -> bool {
        collection::update(texts, id, |t| {
            t.x = x;
            t.y = y;
        })
    }

    /// Replace a text record's content. Returns `false` if `id` is absent.
    pub fn update_text_content(
        &self,
        id: &RecordId,
        content: impl Into<String>,
        texts: &mut [TextRecord],
    ) -> bool {
        let content = content.into();
        collection::update(texts, id, |t| t.content = content)
    }

    /// Delete a text record. Returns `false` if `id` is absent.
    pub fn delete_text(&self, id: &RecordId, texts: &mut Vec<TextRecord>) -> bool {
        let removed = collection::remove(texts, id);
        if removed {
            tracing::debug!("Deleted text {id}");
        }
        removed
    }

    /// Remove every text record.
    pub fn clear_texts(&self, texts: &mut Vec<TextRecord>) {
        collection::clear(texts);
    }
}

impl Default for TextService {
    fn default() -> Self {
        Self::new()
    }
}
