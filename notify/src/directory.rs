//! Connection directory — maps user ids to their live push channels.
//!
//! Shared between the transport layer (which registers a channel when a
//! user's session connects and removes it on disconnect) and the fan-out
//! (which pushes through it). The core never reaches in directly; it goes
//! through the [`crate::NotificationSink`] interface.

use pact_types::{NotificationRecord, UserId};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Registry of live connections, keyed by user id.
pub struct ConnectionDirectory {
    connections: Mutex<HashMap<UserId, mpsc::UnboundedSender<NotificationRecord>>>,
}

impl ConnectionDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Register a user's session. If a previous connection existed it is
    /// replaced (the old sender is dropped, closing that channel).
    pub fn connect(&self, user: UserId) -> mpsc::UnboundedReceiver<NotificationRecord> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().insert(user, tx);
        rx
    }

    /// Remove a user's session.
    pub fn disconnect(&self, user: UserId) {
        self.lock().remove(&user);
    }

    /// Push a notification to a connected user. Returns `false` when the
    /// user has no connection or their channel has closed; a closed
    /// channel is pruned on the way out.
    pub fn push(&self, user: UserId, notification: &NotificationRecord) -> bool {
        let mut connections = self.lock();
        match connections.get(&user) {
            Some(tx) => {
                if tx.send(notification.clone()).is_ok() {
                    true
                } else {
                    connections.remove(&user);
                    false
                }
            }
            None => false,
        }
    }

    /// Whether a user currently has a registered connection.
    pub fn is_connected(&self, user: UserId) -> bool {
        self.lock().contains_key(&user)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<UserId, mpsc::UnboundedSender<NotificationRecord>>>
    {
        self.connections.lock().expect("directory mutex poisoned")
    }
}

impl Default for ConnectionDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_types::{NotificationId, NotificationKind, Timestamp};

    fn notification(user: UserId) -> NotificationRecord {
        NotificationRecord {
            id: NotificationId::new(1),
            user_id: user,
            kind: NotificationKind::SystemMessage,
            title: "hi".into(),
            content: String::new(),
            link_id: None,
            is_read: false,
            created_at: Timestamp::new(0),
        }
    }

    #[test]
    fn push_reaches_a_connected_user() {
        let directory = ConnectionDirectory::new();
        let user = UserId::new(1);
        let mut rx = directory.connect(user);

        assert!(directory.push(user, &notification(user)));
        let received = rx.try_recv().unwrap();
        assert_eq!(received.title, "hi");
    }

    #[test]
    fn push_to_absent_user_is_false() {
        let directory = ConnectionDirectory::new();
        assert!(!directory.push(UserId::new(9), &notification(UserId::new(9))));
    }

    #[test]
    fn reconnect_replaces_the_old_channel() {
        let directory = ConnectionDirectory::new();
        let user = UserId::new(1);
        let mut old_rx = directory.connect(user);
        let mut new_rx = directory.connect(user);
        assert_eq!(directory.len(), 1);

        assert!(directory.push(user, &notification(user)));
        assert!(old_rx.try_recv().is_err());
        assert!(new_rx.try_recv().is_ok());
    }

    #[test]
    fn closed_channel_is_pruned_on_push() {
        let directory = ConnectionDirectory::new();
        let user = UserId::new(1);
        let rx = directory.connect(user);
        drop(rx);

        assert!(!directory.push(user, &notification(user)));
        assert!(!directory.is_connected(user));
    }

    #[test]
    fn disconnect_removes_the_entry() {
        let directory = ConnectionDirectory::new();
        let user = UserId::new(1);
        let _rx = directory.connect(user);
        directory.disconnect(user);
        assert!(directory.is_empty());
    }
}
