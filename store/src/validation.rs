//! Validation ("vouch") storage trait.

use crate::StoreError;
use pact_types::{PromiseId, UserId, ValidationRecord};

/// Trait for validation rows.
///
/// Rows are written only through [`crate::CommitStore::commit`] so the
/// insert lands atomically with the status write it may trigger; this trait
/// covers the read side.
pub trait ValidationStore {
    /// Whether a validation exists for the (promise, validator) pair.
    fn validation_exists(&self, promise: PromiseId, validator: UserId)
        -> Result<bool, StoreError>;

    /// All validations recorded for a promise, in insertion order.
    fn validations_for(&self, promise: PromiseId) -> Result<Vec<ValidationRecord>, StoreError>;
}
