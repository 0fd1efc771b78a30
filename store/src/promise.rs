//! Promise storage trait.

use crate::StoreError;
use pact_types::{PromiseDraft, PromiseId, PromiseRecord, Timestamp, UserId};

/// Trait for promise records.
pub trait PromiseStore {
    /// Fetch a promise.
    fn get_promise(&self, id: PromiseId) -> Result<PromiseRecord, StoreError>;

    /// Insert a new promise from a draft, allocating its id. The record
    /// starts `Pending` with no evidence and version 0.
    fn insert_promise(
        &self,
        owner: UserId,
        draft: &PromiseDraft,
        now: Timestamp,
    ) -> Result<PromiseRecord, StoreError>;

    /// Ids of promises whose deadline is strictly before `now` and whose
    /// status is still expirable (Pending or PendingApproval).
    fn expired_promises(&self, now: Timestamp) -> Result<Vec<PromiseId>, StoreError>;

    /// All promises owned by a user, newest first.
    fn promises_for_owner(&self, owner: UserId) -> Result<Vec<PromiseRecord>, StoreError>;
}
