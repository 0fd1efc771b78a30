//! User storage trait.

use crate::StoreError;
use pact_types::{UserId, UserRecord};

/// Trait for the trust/economy slice of user records.
///
/// Creation and deletion of users is the identity subsystem's concern; the
/// engine only reads records and writes the numeric fields back through
/// transition batches. `put_user` exists for seeding and for backends that
/// mirror an external user table.
pub trait UserStore {
    /// Fetch a user record.
    fn get_user(&self, id: UserId) -> Result<UserRecord, StoreError>;

    /// Insert or overwrite a user record (version is taken as-is).
    fn put_user(&self, record: &UserRecord) -> Result<(), StoreError>;
}
