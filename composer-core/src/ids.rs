//! Record identifiers and the sequences that generate them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Unique identifier for a record, e.g. `image-3` or `text-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Build an identifier from a prefix and a sequence number.
    #[must_use]
    pub fn from_parts(prefix: &str, n: u64) -> Self {
        Self(format!("{prefix}-{n}"))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A monotonic counter shared by every clone.
///
/// Clones observe the same counter, so two services handed clones of one
/// sequence never hand out the same number.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    last: Arc<AtomicU64>,
}

impl IdSequence {
    /// A fresh sequence whose first value is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence whose first value is `first`.
    ///
    /// Values start at 1, so `starting_at(0)` behaves like [`IdSequence::new`].
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            last: Arc::new(AtomicU64::new(first.max(1) - 1)),
        }
    }

    /// Advance the sequence and return the new value.
    pub fn next_value(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The most recently issued value (0 if none).
    #[must_use]
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

/// Produces prefixed [`RecordId`]s from an [`IdSequence`].
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    sequence: IdSequence,
}

impl IdGenerator {
    /// Generator with its own fresh sequence.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_sequence(prefix, IdSequence::new())
    }

    /// Generator drawing from an injected sequence.
    #[must_use]
    pub fn with_sequence(prefix: impl Into<String>, sequence: IdSequence) -> Self {
        Self {
            prefix: prefix.into(),
            sequence,
        }
    }

    /// Issue the next identifier.
    pub fn next_id(&self) -> RecordId {
        RecordId::from_parts(&self.prefix, self.sequence.next_value())
    }

    /// The identifier prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
