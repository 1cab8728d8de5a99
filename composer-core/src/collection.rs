//! Identifier-based operations over caller-owned record collections.
//!
//! Services never own the collections they work on; callers pass their
//! `Vec` in and the functions here mutate it in place.

use crate::{Record, RecordId};

/// Find a record by identifier.
#[must_use]
pub fn find<'a, R: Record>(records: &'a [R], id: &RecordId) -> Option<&'a R> {
    records.iter().find(|r| r.id() == id)
}

/// Find a record by identifier for mutation.
pub fn find_mut<'a, R: Record>(records: &'a mut [R], id: &RecordId) -> Option<&'a mut R> {
    records.iter_mut().find(|r| r.id() == id)
}

/// Run `apply` on the record with `id`.
///
/// Returns `false` and leaves the collection untouched when no record matches.
pub fn update<R: Record>(records: &mut [R], id: &RecordId, apply: impl FnOnce(&mut R)) -> bool {
    match find_mut(records, id) {
        Some(record) => {
            apply(record);
            true
        }
        None => false,
    }
}

/// Remove the first record with `id`, preserving the order of the rest.
///
/// Returns `true` if exactly one record was removed.
pub fn remove<R: Record>(records: &mut Vec<R>, id: &RecordId) -> bool {
    match records.iter().position(|r| r.id() == id) {
        Some(index) => {
            records.remove(index);
            true
        }
        None => false,
    }
}

/// Empty the collection.
pub fn clear<R: Record>(records: &mut Vec<R>) {
    records.clear();
}
