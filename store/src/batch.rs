//! Transition write batching — groups a lifecycle transition's writes into
//! one all-or-nothing commit.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = TransitionBatch::default();
//! batch.insert_validation = Some(NewValidation { promise_id, validator_id, weight });
//! batch.put_promise = Some(updated_promise);   // carries the version it was read at
//! batch.put_user = Some(rewarded_owner);       // likewise
//! store.commit(batch)?;
//! ```
//!
//! If any version check fails or the validation insert would duplicate an
//! existing (promise, validator) pair, nothing is applied.

use pact_types::{PromiseId, PromiseRecord, UserId, UserRecord};

/// A validation row to insert, before the store allocates its id.
#[derive(Clone, Debug)]
pub struct NewValidation {
    pub promise_id: PromiseId,
    pub validator_id: UserId,
    /// The validator's reputation captured at vouch time.
    pub weight: i64,
}

/// The writes of one lifecycle transition.
///
/// `put_promise` and `put_user` are versioned: each record's `version` field
/// must equal the stored row's current version, and the committed row is
/// stored with `version + 1`.
#[derive(Clone, Debug, Default)]
pub struct TransitionBatch {
    pub insert_validation: Option<NewValidation>,
    pub put_promise: Option<PromiseRecord>,
    pub put_user: Option<UserRecord>,
}

impl TransitionBatch {
    /// Whether the batch carries no writes at all.
    pub fn is_empty(&self) -> bool {
        self.insert_validation.is_none() && self.put_promise.is_none() && self.put_user.is_none()
    }
}
