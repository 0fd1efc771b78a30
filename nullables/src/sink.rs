//! Nullable push sink — records deliveries instead of sending them.

use pact_notify::NotificationSink;
use pact_types::{NotificationRecord, UserId};
use std::sync::Mutex;

/// A sink that captures every delivery attempt for assertions.
pub struct NullSink {
    delivered: Mutex<Vec<(UserId, NotificationRecord)>>,
    /// When false, every delivery reports "no live connection".
    online: bool,
}

impl NullSink {
    /// A sink where every user counts as connected.
    pub fn new() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            online: true,
        }
    }

    /// A sink where no user is connected. Attempts are still recorded.
    pub fn offline() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            online: false,
        }
    }

    /// Snapshot of every delivery attempt so far.
    pub fn deliveries(&self) -> Vec<(UserId, NotificationRecord)> {
        self.delivered.lock().expect("sink mutex poisoned").clone()
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for NullSink {
    fn deliver(&self, user: UserId, notification: &NotificationRecord) -> bool {
        self.delivered
            .lock()
            .expect("sink mutex poisoned")
            .push((user, notification.clone()));
        self.online
    }
}
