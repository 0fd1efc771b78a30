//! Vouch accumulator — gates a new vouch and computes the fresh tally.
//!
//! The accumulator stages the validation row and returns totals that
//! already include it, so the state machine can evaluate the threshold
//! without a second round trip. Callers must invoke it inside the
//! promise's critical section: the tally is recomputed from storage on
//! every vouch, and only the lock guarantees no concurrent insert lands
//! between the read and the eventual commit.

use crate::error::LifecycleError;
use pact_ledger::vouch_weight;
use pact_store::{NewValidation, Store, ValidationStore};
use pact_types::{PromiseRecord, UserRecord};
use serde::{Deserialize, Serialize};

/// Running totals over a promise's validations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VouchTally {
    /// Number of distinct validators. The completion predicate.
    pub vouches: u32,
    /// Sum of captured reputation weights, reported for display and audit.
    pub weight_sum: i64,
}

/// A gated vouch: the row to insert plus the tally including it.
#[derive(Clone, Debug)]
pub struct StagedVouch {
    pub validation: NewValidation,
    pub tally: VouchTally,
}

pub struct VouchAccumulator;

impl VouchAccumulator {
    /// Gate a vouch and stage its validation row.
    ///
    /// Rejections, in order: `DuplicateVouch` for a repeated
    /// (promise, validator) pair, `SelfVouch` for the owner,
    /// `PromiseNotVotable` unless the promise is collecting vouches.
    pub fn stage(
        store: &dyn Store,
        promise: &PromiseRecord,
        validator: &UserRecord,
    ) -> Result<StagedVouch, LifecycleError> {
        if store.validation_exists(promise.id, validator.id)? {
            return Err(LifecycleError::DuplicateVouch);
        }
        if validator.id == promise.owner {
            return Err(LifecycleError::SelfVouch);
        }
        if !promise.status.is_votable() {
            return Err(LifecycleError::PromiseNotVotable {
                status: promise.status,
            });
        }

        let weight = vouch_weight(validator);
        let existing = store.validations_for(promise.id)?;
        let tally = VouchTally {
            vouches: existing.len() as u32 + 1,
            weight_sum: existing.iter().map(|v| v.weight).sum::<i64>() + weight,
        };

        Ok(StagedVouch {
            validation: NewValidation {
                promise_id: promise.id,
                validator_id: validator.id,
                weight,
            },
            tally,
        })
    }
}
