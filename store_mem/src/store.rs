//! The `MemStore` tables and trait implementations.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use pact_store::{
    CommitStore, NewNotification, NotificationStore, PromiseStore, StoreError, TransitionBatch,
    UserStore, ValidationStore,
};
use pact_types::{
    NotificationId, NotificationRecord, PromiseDraft, PromiseId, PromiseRecord, PromiseStatus,
    Timestamp, UserId, UserRecord, ValidationId, ValidationRecord,
};

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, UserRecord>,
    promises: HashMap<PromiseId, PromiseRecord>,
    /// Validations per promise, in insertion order.
    validations: HashMap<PromiseId, Vec<ValidationRecord>>,
    /// Uniqueness index over (promise, validator) pairs.
    vouched: HashSet<(PromiseId, UserId)>,
    notifications: Vec<NotificationRecord>,
    next_promise_id: u64,
    next_validation_id: u64,
    next_notification_id: u64,
}

/// An in-memory store implementing the full [`pact_store::Store`] contract.
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned mutex means a writer panicked mid-update; the tables
        // may be torn, so propagate the panic rather than serve them.
        self.inner.lock().expect("store mutex poisoned")
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for MemStore {
    fn get_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        self.lock()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.lock().users.insert(record.id, record.clone());
        Ok(())
    }
}

impl PromiseStore for MemStore {
    fn get_promise(&self, id: PromiseId) -> Result<PromiseRecord, StoreError> {
        self.lock()
            .promises
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("promise {id}")))
    }

    fn insert_promise(
        &self,
        owner: UserId,
        draft: &PromiseDraft,
        now: Timestamp,
    ) -> Result<PromiseRecord, StoreError> {
        let mut inner = self.lock();
        inner.next_promise_id += 1;
        let record = PromiseRecord {
            id: PromiseId::new(inner.next_promise_id),
            owner,
            title: draft.title.clone(),
            description: draft.description.clone(),
            reward: draft.reward.clone(),
            penalty: draft.penalty.clone(),
            deadline: draft.deadline,
            status: PromiseStatus::Pending,
            evidence_text: None,
            created_at: now,
            version: 0,
        };
        inner.promises.insert(record.id, record.clone());
        Ok(record)
    }

    fn expired_promises(&self, now: Timestamp) -> Result<Vec<PromiseId>, StoreError> {
        let inner = self.lock();
        let mut ids: Vec<PromiseId> = inner
            .promises
            .values()
            .filter(|p| p.status.is_expirable() && p.deadline < now)
            .map(|p| p.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn promises_for_owner(&self, owner: UserId) -> Result<Vec<PromiseRecord>, StoreError> {
        let inner = self.lock();
        let mut records: Vec<PromiseRecord> = inner
            .promises
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect();
        records.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }
}

impl ValidationStore for MemStore {
    fn validation_exists(
        &self,
        promise: PromiseId,
        validator: UserId,
    ) -> Result<bool, StoreError> {
        Ok(self.lock().vouched.contains(&(promise, validator)))
    }

    fn validations_for(&self, promise: PromiseId) -> Result<Vec<ValidationRecord>, StoreError> {
        Ok(self
            .lock()
            .validations
            .get(&promise)
            .cloned()
            .unwrap_or_default())
    }
}

impl NotificationStore for MemStore {
    fn append_notification(
        &self,
        new: &NewNotification,
    ) -> Result<NotificationRecord, StoreError> {
        let mut inner = self.lock();
        inner.next_notification_id += 1;
        let record = NotificationRecord {
            id: NotificationId::new(inner.next_notification_id),
            user_id: new.user_id,
            kind: new.kind,
            title: new.title.clone(),
            content: new.content.clone(),
            link_id: new.link_id,
            is_read: false,
            created_at: new.created_at,
        };
        inner.notifications.push(record.clone());
        Ok(record)
    }

    fn notifications_for(&self, user: UserId) -> Result<Vec<NotificationRecord>, StoreError> {
        let inner = self.lock();
        let mut records: Vec<NotificationRecord> = inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    fn mark_read(&self, user: UserId, id: NotificationId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let record = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user)
            .ok_or_else(|| StoreError::NotFound(format!("notification {id}")))?;
        record.is_read = true;
        Ok(())
    }
}

impl CommitStore for MemStore {
    fn commit(&self, batch: TransitionBatch) -> Result<(), StoreError> {
        let mut inner = self.lock();

        // Check everything before writing anything.
        if let Some(nv) = &batch.insert_validation {
            if inner.vouched.contains(&(nv.promise_id, nv.validator_id)) {
                return Err(StoreError::Duplicate(format!(
                    "validation ({}, {})",
                    nv.promise_id, nv.validator_id
                )));
            }
        }
        if let Some(p) = &batch.put_promise {
            let stored = inner
                .promises
                .get(&p.id)
                .ok_or_else(|| StoreError::NotFound(format!("promise {}", p.id)))?;
            if stored.version != p.version {
                return Err(StoreError::Conflict {
                    entity: format!("promise {}", p.id),
                });
            }
        }
        if let Some(u) = &batch.put_user {
            let stored = inner
                .users
                .get(&u.id)
                .ok_or_else(|| StoreError::NotFound(format!("user {}", u.id)))?;
            if stored.version != u.version {
                return Err(StoreError::Conflict {
                    entity: format!("user {}", u.id),
                });
            }
        }

        // All checks passed; apply.
        if let Some(nv) = batch.insert_validation {
            inner.next_validation_id += 1;
            let record = ValidationRecord {
                id: ValidationId::new(inner.next_validation_id),
                promise_id: nv.promise_id,
                validator_id: nv.validator_id,
                weight: nv.weight,
            };
            inner.vouched.insert((nv.promise_id, nv.validator_id));
            inner.validations.entry(nv.promise_id).or_default().push(record);
        }
        if let Some(mut p) = batch.put_promise {
            p.version += 1;
            inner.promises.insert(p.id, p);
        }
        if let Some(mut u) = batch.put_user {
            u.version += 1;
            inner.users.insert(u.id, u);
        }
        Ok(())
    }
}
