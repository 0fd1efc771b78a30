//! Abstract storage traits for the PACT engine.
//!
//! Every storage backend (the in-memory reference store, or anything a
//! deployment swaps in) implements these traits. The rest of the workspace
//! depends only on the traits.
//!
//! Single-record reads and writes go through the per-family traits. Every
//! lifecycle transition instead commits one [`TransitionBatch`] through
//! [`CommitStore`]: the batch applies all-or-nothing, and versioned puts are
//! rejected with [`StoreError::Conflict`] when the row changed underneath
//! the caller.

pub mod batch;
pub mod error;
pub mod notification;
pub mod promise;
pub mod user;
pub mod validation;

pub use batch::{NewValidation, TransitionBatch};
pub use error::StoreError;
pub use notification::{NewNotification, NotificationStore};
pub use promise::PromiseStore;
pub use user::UserStore;
pub use validation::ValidationStore;

/// The full storage collaborator the engine requires.
pub trait Store:
    UserStore + PromiseStore + ValidationStore + NotificationStore + CommitStore + Send + Sync
{
}

impl<T> Store for T where
    T: UserStore + PromiseStore + ValidationStore + NotificationStore + CommitStore + Send + Sync
{
}

/// Atomic application of a transition's writes.
pub trait CommitStore {
    /// Apply the batch all-or-nothing.
    ///
    /// Version checks run before any write: if any versioned put carries a
    /// stale version, nothing is applied and [`StoreError::Conflict`] is
    /// returned. A duplicate validation insert likewise aborts the whole
    /// batch with [`StoreError::Duplicate`].
    fn commit(&self, batch: TransitionBatch) -> Result<(), StoreError>;
}
