//! Promise lifecycle — the weighted-consensus engine.
//!
//! A promise moves `Pending → PendingApproval → Completed`, or to `Failed`
//! when its deadline elapses first. Vouches from distinct validators
//! accumulate while the promise is in `PendingApproval`; crossing the
//! configured threshold completes the promise and pays the owner exactly
//! once. A background sweep independently fails overdue promises and is
//! expected to race (and lose to) user-driven completions.
//!
//! All mutation of a single promise's status serializes through
//! [`LifecycleEngine`]: a per-promise lock scopes the read-check-write
//! sequence, and every status write commits atomically with its ledger
//! side effect through one `TransitionBatch`.

pub mod accumulator;
pub mod error;
pub mod event;
pub mod locks;
pub mod machine;
pub mod sweeper;

pub use accumulator::{StagedVouch, VouchAccumulator, VouchTally};
pub use error::LifecycleError;
pub use event::{LifecycleEvent, TransitionObserver};
pub use machine::{LifecycleEngine, VouchOutcome};
pub use sweeper::{DeadlineSweeper, SweepReport};
