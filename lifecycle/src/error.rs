use pact_store::StoreError;
use pact_types::{PromiseStatus, Timestamp};
use thiserror::Error;

/// Local, recoverable failures of lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("only the promise owner may do this")]
    NotOwner,

    #[error("operation not permitted while the promise is {status}")]
    InvalidState { status: PromiseStatus },

    #[error("evidence report too short: {len} characters, minimum {min}")]
    EvidenceTooShort { len: usize, min: usize },

    #[error("this validator has already vouched for the promise")]
    DuplicateVouch,

    #[error("a promise owner cannot vouch for their own promise")]
    SelfVouch,

    #[error("promise is not accepting vouches while {status}")]
    PromiseNotVotable { status: PromiseStatus },

    #[error("deadline {deadline} has not elapsed at {now}")]
    NotExpired { deadline: Timestamp, now: Timestamp },

    #[error("transition kept losing version races, giving up")]
    StorageConflict,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
