//! Notification storage trait.

use crate::StoreError;
use pact_types::{NotificationId, NotificationKind, NotificationRecord, PromiseId, Timestamp, UserId};

/// The fields of a notification before the store allocates its id.
#[derive(Clone, Debug)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub link_id: Option<PromiseId>,
    pub created_at: Timestamp,
}

/// Trait for notification rows.
///
/// Appends are outside transition batches: a notification is a best-effort
/// durable side channel, never part of the transition's atomic unit.
pub trait NotificationStore {
    /// Append a notification, allocating its id. Starts unread.
    fn append_notification(&self, new: &NewNotification)
        -> Result<NotificationRecord, StoreError>;

    /// All notifications for a user, newest first.
    fn notifications_for(&self, user: UserId) -> Result<Vec<NotificationRecord>, StoreError>;

    /// Flip `is_read` on one of the user's notifications. Fails with
    /// `NotFound` when the id does not exist or belongs to another user.
    fn mark_read(&self, user: UserId, id: NotificationId) -> Result<(), StoreError>;
}
