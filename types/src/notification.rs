//! Notification delivery records.

use crate::id::{NotificationId, PromiseId, UserId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What lifecycle event a notification describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A validator vouched for the recipient's promise.
    VouchReceived,
    /// The recipient's promise reached the vouch threshold.
    PromiseCompleted,
    /// The recipient's promise passed its deadline unfulfilled.
    PromiseFailed,
    /// Free-form message from the operator.
    SystemMessage,
    /// A nudge about an upcoming deadline.
    Reminder,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VouchReceived => "vouch_received",
            Self::PromiseCompleted => "promise_completed",
            Self::PromiseFailed => "promise_failed",
            Self::SystemMessage => "system_message",
            Self::Reminder => "reminder",
        };
        write!(f, "{s}")
    }
}

/// A durable record of a lifecycle event delivered to a user.
///
/// Mutated only to flip `is_read`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    /// The originating promise, when there is one.
    pub link_id: Option<PromiseId>,
    pub is_read: bool,
    pub created_at: Timestamp,
}
