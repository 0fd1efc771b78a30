//! Fan-out of transition events into notifications.

use crate::sink::NotificationSink;
use pact_lifecycle::{LifecycleEvent, TransitionObserver};
use pact_store::{NewNotification, NotificationStore};
use pact_types::{Clock, NotificationKind, UserId};
use pact_utils::format_duration;
use std::sync::Arc;

/// Turns lifecycle events into durable notification rows plus a
/// best-effort live push.
pub struct NotificationFanout {
    store: Arc<dyn NotificationStore + Send + Sync>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl NotificationFanout {
    pub fn new(
        store: Arc<dyn NotificationStore + Send + Sync>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, sink, clock }
    }

    /// Persist and push an operator message unrelated to any transition.
    pub fn system_message(&self, user: UserId, title: &str, content: &str) {
        self.record_and_push(NewNotification {
            user_id: user,
            kind: NotificationKind::SystemMessage,
            title: title.to_owned(),
            content: content.to_owned(),
            link_id: None,
            created_at: self.clock.now(),
        });
    }

    fn compose(&self, event: &LifecycleEvent) -> NewNotification {
        let now = self.clock.now();
        match event {
            LifecycleEvent::VouchReceived {
                promise_id,
                owner,
                title,
                tally,
                ..
            } => NewNotification {
                user_id: *owner,
                kind: NotificationKind::VouchReceived,
                title: "Your promise received a vouch".to_owned(),
                content: format!(
                    "\"{title}\" now has {} vouches (total weight {}).",
                    tally.vouches, tally.weight_sum
                ),
                link_id: Some(*promise_id),
                created_at: now,
            },
            LifecycleEvent::Completed {
                promise_id,
                owner,
                title,
                tally,
            } => NewNotification {
                user_id: *owner,
                kind: NotificationKind::PromiseCompleted,
                title: "Promise completed".to_owned(),
                content: format!(
                    "\"{title}\" was confirmed by {} vouches. Your reward has been credited.",
                    tally.vouches
                ),
                link_id: Some(*promise_id),
                created_at: now,
            },
            LifecycleEvent::Failed {
                promise_id,
                owner,
                title,
                deadline,
            } => NewNotification {
                user_id: *owner,
                kind: NotificationKind::PromiseFailed,
                title: "Promise failed".to_owned(),
                content: format!(
                    "\"{title}\" passed its deadline {} ago unfulfilled.",
                    format_duration(deadline.elapsed_since(now))
                ),
                link_id: Some(*promise_id),
                created_at: now,
            },
        }
    }

    fn record_and_push(&self, new: NewNotification) {
        let record = match self.store.append_notification(&new) {
            Ok(record) => record,
            Err(e) => {
                // The transition already committed; all we can do is log.
                tracing::warn!(user = %new.user_id, kind = %new.kind, error = %e, "failed to persist notification");
                return;
            }
        };
        if !self.sink.deliver(record.user_id, &record) {
            tracing::debug!(user = %record.user_id, kind = %record.kind, "recipient offline, durable record only");
        }
    }
}

impl TransitionObserver for NotificationFanout {
    fn on_event(&self, event: &LifecycleEvent) {
        self.record_and_push(self.compose(event));
    }
}
