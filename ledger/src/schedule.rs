//! The reward schedule and weight capture.

use pact_types::{PactParams, UserRecord};
use serde::{Deserialize, Serialize};

/// The weight a validator's vouch carries: their current reputation.
///
/// Callers must capture this inside the same critical section as the
/// validation insert, so a concurrent reputation change cannot leave a
/// stale weight on the row.
pub fn vouch_weight(validator: &UserRecord) -> i64 {
    validator.reputation
}

/// The reward and penalty magnitudes applied at lifecycle transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Reputation added on completion.
    pub reputation_reward: i64,
    /// Coins added on completion.
    pub coin_reward: i64,
    /// Signed reputation delta on failure. Negative: subtracts.
    pub penalty_offset: i64,
}

impl RewardSchedule {
    pub fn from_params(params: &PactParams) -> Self {
        Self {
            reputation_reward: params.reputation_reward,
            coin_reward: params.coin_reward,
            penalty_offset: params.penalty_offset,
        }
    }

    /// Credit the owner for a completed promise.
    pub fn apply_completion_reward(&self, owner: &mut UserRecord) {
        owner.reputation += self.reputation_reward;
        owner.coins += self.coin_reward;
        owner.total_completed += 1;
    }

    /// Debit the owner for a failed promise.
    ///
    /// No floor: reputation is allowed to go negative. A floor, if wanted,
    /// is the caller's policy.
    pub fn apply_failure_penalty(&self, owner: &mut UserRecord) {
        owner.reputation += self.penalty_offset;
        owner.total_failed += 1;
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self::from_params(&PactParams::default())
    }
}
