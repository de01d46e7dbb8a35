//! Identifier allocation for inserts.
//!
//! Runs against the in-memory collection while the caller holds that type's
//! lock, so the scan and the following append are one step.

use crate::error::{Result, StoreError};
use crate::model::{Record, RecordId};

/// Largest id in `existing`, or 0 for an empty collection.
pub fn max_id<T: Record>(existing: &[T]) -> RecordId {
    existing.iter().map(Record::id).max().unwrap_or(0)
}

/// Gives `record` its final id before it is appended to `existing`.
///
/// - id `0`: assigned `max + 1`. Fails once `max` is `RecordId::MAX`.
/// - any other id: kept, unless another record already has it.
pub fn assign_id<T: Record>(existing: &[T], record: &mut T) -> Result<RecordId> {
    let requested = record.id();
    if requested == 0 {
        let next = max_id(existing).checked_add(1).ok_or_else(|| {
            StoreError::Store(format!("id space exhausted for {}", T::TYPE_NAME))
        })?;
        record.set_id(next);
        return Ok(next);
    }

    if existing.iter().any(|item| item.id() == requested) {
        return Err(StoreError::DuplicateKey {
            type_name: T::TYPE_NAME,
            id: requested,
        });
    }
    Ok(requested)
}
