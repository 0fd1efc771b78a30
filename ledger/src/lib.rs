//! Reputation ledger — converts trust-affecting events (vouch, completion,
//! failure) into deltas on a user record.
//!
//! Pure functions over [`pact_types::UserRecord`]; no storage access and no
//! side effects beyond the four numeric fields. Each apply function assumes
//! it is invoked exactly once per transition — that discipline belongs to
//! the promise state machine, which commits the mutated record atomically
//! with the status write that earned it.

mod schedule;

pub use schedule::{vouch_weight, RewardSchedule};
