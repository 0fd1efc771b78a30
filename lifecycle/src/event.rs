//! Transition events emitted after a commit, consumed by the notification
//! fan-out (and anything else that registers).

use crate::accumulator::VouchTally;
use pact_types::{PromiseId, Timestamp, UserId};

/// What just happened to a promise.
///
/// Events are published after the transition's batch has committed; an
/// observer can therefore read the new state back, but can no longer affect
/// the transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A vouch was recorded without crossing the threshold.
    VouchReceived {
        promise_id: PromiseId,
        owner: UserId,
        title: String,
        validator: UserId,
        /// The reputation weight captured on the validation row.
        weight: i64,
        tally: VouchTally,
    },
    /// The vouch threshold was crossed; the promise is completed and the
    /// owner has been rewarded.
    Completed {
        promise_id: PromiseId,
        owner: UserId,
        title: String,
        tally: VouchTally,
    },
    /// The deadline elapsed; the promise is failed and the owner penalized.
    Failed {
        promise_id: PromiseId,
        owner: UserId,
        title: String,
        deadline: Timestamp,
    },
}

impl LifecycleEvent {
    /// The user this event should be delivered to.
    pub fn recipient(&self) -> UserId {
        match self {
            Self::VouchReceived { owner, .. }
            | Self::Completed { owner, .. }
            | Self::Failed { owner, .. } => *owner,
        }
    }

    pub fn promise_id(&self) -> PromiseId {
        match self {
            Self::VouchReceived { promise_id, .. }
            | Self::Completed { promise_id, .. }
            | Self::Failed { promise_id, .. } => *promise_id,
        }
    }
}

/// Consumer of transition events.
///
/// Observers run outside the promise's critical section and after the
/// commit. They must not fail the transition: whatever an observer does
/// with the event (persist it, push it, drop it) is its own business.
pub trait TransitionObserver: Send + Sync {
    fn on_event(&self, event: &LifecycleEvent);
}
