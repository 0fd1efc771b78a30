//! Validation ("vouch") records.

use crate::id::{PromiseId, UserId, ValidationId};
use serde::{Deserialize, Serialize};

/// One validator's endorsement of one promise.
///
/// At most one validation exists per (promise, validator) pair, a user never
/// vouches for their own promise, and the row is never mutated once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub id: ValidationId,
    pub promise_id: PromiseId,
    pub validator_id: UserId,
    /// The validator's reputation captured at vouch time. Never recomputed:
    /// later reputation changes do not retroactively alter past vouches.
    pub weight: i64,
}
