//! Promise state machine — owns every status transition and its side
//! effects.
//!
//! Each operation runs under the promise's lock, re-reads the promise,
//! validates the edge, and commits one `TransitionBatch` carrying the
//! status write together with the ledger mutation it earned. A stale
//! version at commit time (the only writers outside the promise lock are
//! transitions of the same owner's *other* promises) aborts cleanly and
//! the whole operation is retried against fresh reads, a bounded number of
//! times.

use std::sync::{Arc, RwLock};

use crate::accumulator::{VouchAccumulator, VouchTally};
use crate::error::LifecycleError;
use crate::event::{LifecycleEvent, TransitionObserver};
use crate::locks::LockTable;
use pact_ledger::RewardSchedule;
use pact_store::{CommitStore, PromiseStore, Store, StoreError, TransitionBatch, UserStore};
use pact_types::{
    Clock, PactParams, PromiseDraft, PromiseId, PromiseRecord, PromiseStatus, Timestamp, UserId,
};

/// Attempts per transition before surfacing `StorageConflict`.
const MAX_TRANSITION_ATTEMPTS: u32 = 3;

/// Result of an accepted vouch.
#[derive(Clone, Debug)]
pub struct VouchOutcome {
    /// The reputation weight captured on the validation row.
    pub weight: i64,
    /// Totals including this vouch.
    pub tally: VouchTally,
    /// Whether this vouch crossed the threshold and completed the promise.
    pub completed: bool,
}

/// The engine through which all promise mutation flows.
pub struct LifecycleEngine {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    params: PactParams,
    schedule: RewardSchedule,
    locks: LockTable,
    observers: RwLock<Vec<Arc<dyn TransitionObserver>>>,
}

impl LifecycleEngine {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, params: PactParams) -> Self {
        let schedule = RewardSchedule::from_params(&params);
        Self {
            store,
            clock,
            params,
            schedule,
            locks: LockTable::new(),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register a consumer of transition events. Observers run after the
    /// commit, outside the promise's critical section.
    pub fn register_observer(&self, observer: Arc<dyn TransitionObserver>) {
        self.observers
            .write()
            .expect("observer list poisoned")
            .push(observer);
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn params(&self) -> &PactParams {
        &self.params
    }

    /// Publish a new promise. It starts `Pending`; no side effects.
    pub fn create_promise(
        &self,
        owner: UserId,
        draft: &PromiseDraft,
    ) -> Result<PromiseRecord, LifecycleError> {
        self.store.get_user(owner)?;
        let record = self.store.insert_promise(owner, draft, self.clock.now())?;
        tracing::debug!(promise = %record.id, owner = %owner, deadline = %record.deadline, "promise created");
        Ok(record)
    }

    /// Owner submits proof of completion: `Pending → PendingApproval`.
    pub fn submit_evidence(
        &self,
        promise_id: PromiseId,
        caller: UserId,
        report: &str,
    ) -> Result<PromiseRecord, LifecycleError> {
        let record = self.locks.with_lock(promise_id, || {
            self.retrying(|| self.submit_evidence_locked(promise_id, caller, report))
        })?;
        tracing::info!(promise = %promise_id, owner = %caller, "evidence submitted, awaiting vouches");
        Ok(record)
    }

    fn submit_evidence_locked(
        &self,
        promise_id: PromiseId,
        caller: UserId,
        report: &str,
    ) -> Result<PromiseRecord, LifecycleError> {
        let mut promise = self.store.get_promise(promise_id)?;
        if promise.owner != caller {
            return Err(LifecycleError::NotOwner);
        }
        if promise.status != PromiseStatus::Pending {
            return Err(LifecycleError::InvalidState {
                status: promise.status,
            });
        }
        let len = report.chars().count();
        if len < self.params.min_evidence_len {
            return Err(LifecycleError::EvidenceTooShort {
                len,
                min: self.params.min_evidence_len,
            });
        }

        promise.evidence_text = Some(report.to_owned());
        promise.status = PromiseStatus::PendingApproval;
        self.store.commit(TransitionBatch {
            put_promise: Some(promise.clone()),
            ..Default::default()
        })?;
        promise.version += 1;
        Ok(promise)
    }

    /// Record a validator's vouch; completes the promise when the tally
    /// crosses the threshold.
    pub fn vouch(
        &self,
        promise_id: PromiseId,
        validator: UserId,
    ) -> Result<VouchOutcome, LifecycleError> {
        let (outcome, event) = self.locks.with_lock(promise_id, || {
            self.retrying(|| self.vouch_locked(promise_id, validator))
        })?;
        if outcome.completed {
            self.locks.forget(promise_id);
        }
        self.publish(&event);
        Ok(outcome)
    }

    fn vouch_locked(
        &self,
        promise_id: PromiseId,
        validator: UserId,
    ) -> Result<(VouchOutcome, LifecycleEvent), LifecycleError> {
        let promise = self.store.get_promise(promise_id)?;
        let validator_record = self.store.get_user(validator)?;
        let staged = VouchAccumulator::stage(self.store.as_ref(), &promise, &validator_record)?;

        let weight = staged.validation.weight;
        let tally = staged.tally;
        let mut batch = TransitionBatch {
            insert_validation: Some(staged.validation),
            ..Default::default()
        };

        // The votable check above pins status to PendingApproval, and the
        // promise lock keeps it pinned through the commit below: two
        // concurrent vouches cannot both observe "not yet crossed".
        let completed = tally.vouches >= self.params.vouch_threshold;
        if completed {
            let mut updated = promise.clone();
            updated.status = PromiseStatus::Completed;
            let mut owner = self.store.get_user(promise.owner)?;
            self.schedule.apply_completion_reward(&mut owner);
            batch.put_promise = Some(updated);
            batch.put_user = Some(owner);
        }

        match self.store.commit(batch) {
            Ok(()) => {}
            // Lost a duplicate race outside the lock's reach (e.g. a
            // backend shared with another writer).
            Err(StoreError::Duplicate(_)) => return Err(LifecycleError::DuplicateVouch),
            Err(e) => return Err(e.into()),
        }

        let event = if completed {
            tracing::info!(
                promise = %promise_id,
                owner = %promise.owner,
                vouches = tally.vouches,
                weight_sum = tally.weight_sum,
                "vouch threshold crossed, promise completed"
            );
            LifecycleEvent::Completed {
                promise_id,
                owner: promise.owner,
                title: promise.title.clone(),
                tally,
            }
        } else {
            tracing::debug!(
                promise = %promise_id,
                validator = %validator,
                vouches = tally.vouches,
                "vouch recorded"
            );
            LifecycleEvent::VouchReceived {
                promise_id,
                owner: promise.owner,
                title: promise.title.clone(),
                validator,
                weight,
                tally,
            }
        };

        Ok((
            VouchOutcome {
                weight,
                tally,
                completed,
            },
            event,
        ))
    }

    /// Fail a promise whose deadline has elapsed: `Pending |
    /// PendingApproval → Failed`.
    ///
    /// Called by the deadline sweeper; also callable directly. Re-validates
    /// state under the lock, so sweeping a promise that a racing vouch just
    /// completed yields `InvalidState` and nothing else.
    pub fn sweep_expire(
        &self,
        promise_id: PromiseId,
        now: Timestamp,
    ) -> Result<PromiseRecord, LifecycleError> {
        let (record, event) = self.locks.with_lock(promise_id, || {
            self.retrying(|| self.sweep_expire_locked(promise_id, now))
        })?;
        self.locks.forget(promise_id);
        self.publish(&event);
        Ok(record)
    }

    fn sweep_expire_locked(
        &self,
        promise_id: PromiseId,
        now: Timestamp,
    ) -> Result<(PromiseRecord, LifecycleEvent), LifecycleError> {
        let mut promise = self.store.get_promise(promise_id)?;
        if now < promise.deadline {
            return Err(LifecycleError::NotExpired {
                deadline: promise.deadline,
                now,
            });
        }
        if !promise.status.is_expirable() {
            return Err(LifecycleError::InvalidState {
                status: promise.status,
            });
        }

        promise.status = PromiseStatus::Failed;
        let mut owner = self.store.get_user(promise.owner)?;
        self.schedule.apply_failure_penalty(&mut owner);
        self.store.commit(TransitionBatch {
            put_promise: Some(promise.clone()),
            put_user: Some(owner),
            ..Default::default()
        })?;
        promise.version += 1;

        tracing::info!(
            promise = %promise_id,
            owner = %promise.owner,
            deadline = %promise.deadline,
            "deadline elapsed, promise failed"
        );
        let event = LifecycleEvent::Failed {
            promise_id,
            owner: promise.owner,
            title: promise.title.clone(),
            deadline: promise.deadline,
        };
        Ok((promise, event))
    }

    /// Run `op` until it succeeds, fails non-retryably, or exhausts the
    /// attempt budget on version conflicts.
    fn retrying<T>(
        &self,
        mut op: impl FnMut() -> Result<T, LifecycleError>,
    ) -> Result<T, LifecycleError> {
        for attempt in 1..=MAX_TRANSITION_ATTEMPTS {
            match op() {
                Err(LifecycleError::Store(e)) if e.is_retryable() => {
                    tracing::debug!(attempt, error = %e, "transition lost a version race, retrying");
                }
                other => return other,
            }
        }
        tracing::warn!("transition exhausted its retry budget");
        Err(LifecycleError::StorageConflict)
    }

    fn publish(&self, event: &LifecycleEvent) {
        let observers = self.observers.read().expect("observer list poisoned");
        for observer in observers.iter() {
            observer.on_event(event);
        }
    }
}
