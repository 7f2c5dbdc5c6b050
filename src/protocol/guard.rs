//! # Concurrency Guard
//!
//! Two ways to change an existing row:
//!
//! - [`replace`]: optimistic full replace. The version check and the write are one
//!   compare-and-swap on the row, and a successful swap bumps the version by one.
//! - [`patch`]: sparse merge with no version check and no version bump. Concurrent
//!   patches are last-writer-wins per field.

use crate::error::ServiceError;
use crate::framework::{EntityId, Transaction, Version, Versioned};

/// Replace every mutable field of row `id` if its version is still `expected`.
///
/// Returns the new version.
///
/// # Errors
/// - [`ServiceError::NotFound`] if the row does not exist.
/// - [`ServiceError::VersionConflict`] if the row moved on; nothing is written.
pub fn replace<T: Versioned>(
    txn: &mut Transaction<'_>,
    id: EntityId,
    expected: Version,
    params: T::Replace,
) -> Result<Version, ServiceError> {
    txn.try_update::<T, _, _>(id, |row| {
        let current = row.version();
        if current != expected {
            return Err(ServiceError::VersionConflict {
                entity: T::NAME,
                id,
                expected,
                current,
            });
        }
        row.apply_replace(params);
        *row.version_mut() = current + 1;
        Ok(current + 1)
    })
    .unwrap_or_else(|| Err(ServiceError::not_found::<T>(id)))
}

/// Apply the present fields of `patch` to row `id`. The version is left alone.
pub fn patch<T: Versioned>(
    txn: &mut Transaction<'_>,
    id: EntityId,
    patch: T::Patch,
) -> Result<T, ServiceError> {
    txn.update::<T, _>(id, |row| {
        row.apply_patch(patch);
        row.clone()
    })
    .ok_or_else(|| ServiceError::not_found::<T>(id))
}
