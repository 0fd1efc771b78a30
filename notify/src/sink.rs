//! The push sink boundary.

use crate::directory::ConnectionDirectory;
use pact_types::{NotificationRecord, UserId};
use std::sync::Arc;

/// Fire-and-forget live delivery.
///
/// Returns whether the push was handed off to a live connection. `false`
/// is not an error: it only means the durable record is all the recipient
/// will get until they next look.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, user: UserId, notification: &NotificationRecord) -> bool;
}

/// The standard sink: pushes through a [`ConnectionDirectory`].
pub struct DirectorySink {
    directory: Arc<ConnectionDirectory>,
}

impl DirectorySink {
    pub fn new(directory: Arc<ConnectionDirectory>) -> Self {
        Self { directory }
    }
}

impl NotificationSink for DirectorySink {
    fn deliver(&self, user: UserId, notification: &NotificationRecord) -> bool {
        self.directory.push(user, notification)
    }
}
