//! End-to-end tests of the lifecycle engine against the in-memory store.

use std::sync::{Arc, Mutex};
use std::thread;

use pact_lifecycle::{
    DeadlineSweeper, LifecycleEngine, LifecycleError, LifecycleEvent, TransitionObserver,
};
use pact_nullables::NullClock;
use pact_store::{PromiseStore, Store, UserStore, ValidationStore};
use pact_store_mem::MemStore;
use pact_types::{Clock, PactParams, PromiseDraft, PromiseStatus, Timestamp, UserId, UserRecord};

/// Observer that collects every published event.
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().unwrap().clone()
    }

    fn completed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Completed { .. }))
            .count()
    }
}

impl TransitionObserver for RecordingObserver {
    fn on_event(&self, event: &LifecycleEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

struct Fixture {
    store: Arc<MemStore>,
    clock: Arc<NullClock>,
    engine: Arc<LifecycleEngine>,
    observer: Arc<RecordingObserver>,
}

fn fixture_with(params: PactParams) -> Fixture {
    let store = Arc::new(MemStore::new());
    let clock = Arc::new(NullClock::new(1_000));
    let engine = Arc::new(LifecycleEngine::new(
        Arc::clone(&store) as Arc<dyn Store>,
        Arc::clone(&clock) as _,
        params,
    ));
    let observer = Arc::new(RecordingObserver::default());
    engine.register_observer(Arc::clone(&observer) as _);
    Fixture {
        store,
        clock,
        engine,
        observer,
    }
}

fn fixture() -> Fixture {
    fixture_with(PactParams::default())
}

fn seed_user(store: &MemStore, id: u64, reputation: i64) -> UserId {
    let mut user = UserRecord::new(UserId::new(id));
    user.reputation = reputation;
    store.put_user(&user).unwrap();
    user.id
}

fn draft(deadline: Timestamp) -> PromiseDraft {
    PromiseDraft {
        title: "run a marathon".into(),
        description: "before the season ends".into(),
        reward: "celebration dinner".into(),
        penalty: "donate to charity".into(),
        deadline,
    }
}

#[test]
fn full_completion_scenario() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    for id in 2..=4 {
        seed_user(&f.store, id, 1);
    }

    // Deadline one hour out.
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(3_600)))
        .unwrap();
    assert_eq!(promise.status, PromiseStatus::Pending);

    let submitted = f
        .engine
        .submit_evidence(promise.id, owner, "finished in 4h12m, photos attached")
        .unwrap();
    assert_eq!(submitted.status, PromiseStatus::PendingApproval);
    assert!(submitted.evidence_text.is_some());

    for id in 2..=3 {
        let outcome = f.engine.vouch(promise.id, UserId::new(id)).unwrap();
        assert!(!outcome.completed);
    }
    let third = f.engine.vouch(promise.id, UserId::new(4)).unwrap();
    assert!(third.completed);
    assert_eq!(third.tally.vouches, 3);
    assert_eq!(third.tally.weight_sum, 3);

    let stored = f.engine.store().get_promise(promise.id).unwrap();
    assert_eq!(stored.status, PromiseStatus::Completed);

    let rewarded = f.store.get_user(owner).unwrap();
    assert_eq!(rewarded.reputation, 20);
    assert_eq!(rewarded.coins, 150);
    assert_eq!(rewarded.total_completed, 1);
    assert_eq!(rewarded.total_failed, 0);

    assert_eq!(f.observer.completed_count(), 1);
}

#[test]
fn sweep_fails_overdue_pending_promise() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(10)))
        .unwrap();

    f.clock.advance(11);
    let sweeper = DeadlineSweeper::new(Arc::clone(&f.engine));
    let report = sweeper.run_once(f.clock.now());
    assert_eq!(report.examined, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.raced, 0);

    let stored = f.engine.store().get_promise(promise.id).unwrap();
    assert_eq!(stored.status, PromiseStatus::Failed);

    let penalized = f.store.get_user(owner).unwrap();
    assert_eq!(penalized.reputation, 5);
    assert_eq!(penalized.total_failed, 1);
    assert_eq!(penalized.total_completed, 0);

    let events = f.observer.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], LifecycleEvent::Failed { .. }));
}

#[test]
fn sweep_is_idempotent_on_terminal_promises() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    f.engine
        .create_promise(owner, &draft(f.clock.now().plus(10)))
        .unwrap();
    f.clock.advance(60);

    let sweeper = DeadlineSweeper::new(Arc::clone(&f.engine));
    assert_eq!(sweeper.run_once(f.clock.now()).failed, 1);

    // Second pass sees nothing: the expiry query skips terminal promises.
    let second = sweeper.run_once(f.clock.now());
    assert_eq!(second.examined, 0);
    assert_eq!(second.failed, 0);

    // Even a direct re-sweep is a swallowed no-op at the report level.
    let err = f
        .engine
        .sweep_expire(pact_types::PromiseId::new(1), f.clock.now())
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidState { .. }));

    let penalized = f.store.get_user(owner).unwrap();
    assert_eq!(penalized.reputation, 5);
    assert_eq!(penalized.total_failed, 1);
}

#[test]
fn sweep_rejects_unexpired_promise() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(100)))
        .unwrap();

    let err = f.engine.sweep_expire(promise.id, f.clock.now()).unwrap_err();
    assert!(matches!(err, LifecycleError::NotExpired { .. }));
    assert_eq!(
        f.engine.store().get_promise(promise.id).unwrap().status,
        PromiseStatus::Pending
    );
}

#[test]
fn sweep_swallows_promises_completed_after_the_query() {
    let f = fixture_with(PactParams {
        vouch_threshold: 1,
        ..Default::default()
    });
    let owner = seed_user(&f.store, 1, 10);
    let validator = seed_user(&f.store, 2, 10);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(10)))
        .unwrap();
    f.engine
        .submit_evidence(promise.id, owner, "done early, see the log")
        .unwrap();

    f.clock.advance(60);
    let now = f.clock.now();
    // The query would return this promise; a vouch completes it first.
    let ids = f.engine.store().expired_promises(now).unwrap();
    assert_eq!(ids, vec![promise.id]);
    assert!(f.engine.vouch(promise.id, validator).unwrap().completed);

    let sweeper = DeadlineSweeper::new(Arc::clone(&f.engine));
    // Re-running the full pass now finds nothing, but driving the stale id
    // directly exercises the race path.
    let err = f.engine.sweep_expire(promise.id, now).unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::InvalidState {
            status: PromiseStatus::Completed
        }
    ));
    assert_eq!(sweeper.run_once(now).examined, 0);

    // Reward stands, no penalty was applied.
    let user = f.store.get_user(owner).unwrap();
    assert_eq!(user.total_completed, 1);
    assert_eq!(user.total_failed, 0);
}

#[test]
fn evidence_gating() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    let stranger = seed_user(&f.store, 2, 10);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(100)))
        .unwrap();

    let err = f
        .engine
        .submit_evidence(promise.id, stranger, "not my promise but long enough")
        .unwrap_err();
    assert!(matches!(err, LifecycleError::NotOwner));

    let err = f.engine.submit_evidence(promise.id, owner, "too short").unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::EvidenceTooShort { len: 9, min: 10 }
    ));

    // Vouching before evidence is submitted is rejected.
    let err = f.engine.vouch(promise.id, stranger).unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::PromiseNotVotable {
            status: PromiseStatus::Pending
        }
    ));

    f.engine
        .submit_evidence(promise.id, owner, "a sufficiently detailed report")
        .unwrap();
    let err = f
        .engine
        .submit_evidence(promise.id, owner, "submitting everything twice")
        .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::InvalidState {
            status: PromiseStatus::PendingApproval
        }
    ));
}

#[test]
fn self_vouch_rejected_without_side_effects() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(100)))
        .unwrap();
    f.engine
        .submit_evidence(promise.id, owner, "look, it is definitely done")
        .unwrap();

    let err = f.engine.vouch(promise.id, owner).unwrap_err();
    assert!(matches!(err, LifecycleError::SelfVouch));
    assert!(f.engine.store().validations_for(promise.id).unwrap().is_empty());
    assert_eq!(
        f.engine.store().get_promise(promise.id).unwrap().status,
        PromiseStatus::PendingApproval
    );
    assert!(f.observer.events().is_empty());
}

#[test]
fn vouch_weight_is_captured_at_vouch_time() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    let validator = seed_user(&f.store, 2, 25);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(100)))
        .unwrap();
    f.engine
        .submit_evidence(promise.id, owner, "proof with enough characters")
        .unwrap();

    let outcome = f.engine.vouch(promise.id, validator).unwrap();
    assert_eq!(outcome.weight, 25);

    // A later reputation change must not rewrite history.
    let mut changed = f.store.get_user(validator).unwrap();
    changed.reputation = 1;
    f.store.put_user(&changed).unwrap();

    let rows = f.engine.store().validations_for(promise.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].weight, 25);
}

#[test]
fn concurrent_duplicate_vouches_accept_exactly_one() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    let validator = seed_user(&f.store, 2, 10);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(100)))
        .unwrap();
    f.engine
        .submit_evidence(promise.id, owner, "proof with enough characters")
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&f.engine);
        handles.push(thread::spawn(move || engine.vouch(promise.id, validator)));
    }
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(LifecycleError::DuplicateVouch)))
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(f.engine.store().validations_for(promise.id).unwrap().len(), 1);
}

#[test]
fn concurrent_threshold_crossing_rewards_exactly_once() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    for id in 2..=7 {
        seed_user(&f.store, id, 10);
    }
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(100)))
        .unwrap();
    f.engine
        .submit_evidence(promise.id, owner, "proof with enough characters")
        .unwrap();

    let mut handles = Vec::new();
    for id in 2..=7u64 {
        let engine = Arc::clone(&f.engine);
        handles.push(thread::spawn(move || {
            engine.vouch(promise.id, UserId::new(id))
        }));
    }
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // The per-promise lock serializes the six vouches: the first three are
    // accepted (the third completes), the rest see a terminal promise.
    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let completed = results
        .iter()
        .filter(|r| matches!(r, Ok(o) if o.completed))
        .count();
    let not_votable = results
        .iter()
        .filter(|r| matches!(r, Err(LifecycleError::PromiseNotVotable { .. })))
        .count();
    assert_eq!(accepted, 3);
    assert_eq!(completed, 1);
    assert_eq!(not_votable, 3);

    let rewarded = f.store.get_user(owner).unwrap();
    assert_eq!(rewarded.reputation, 20);
    assert_eq!(rewarded.coins, 150);
    assert_eq!(rewarded.total_completed, 1);
    assert_eq!(f.observer.completed_count(), 1);
    assert_eq!(f.engine.store().validations_for(promise.id).unwrap().len(), 3);
}

#[test]
fn same_owner_promises_settle_concurrently() {
    let f = fixture_with(PactParams {
        vouch_threshold: 1,
        ..Default::default()
    });
    let owner = seed_user(&f.store, 1, 10);
    let a = seed_user(&f.store, 2, 10);
    let b = seed_user(&f.store, 3, 10);

    let mut promises = Vec::new();
    for _ in 0..2 {
        let p = f
            .engine
            .create_promise(owner, &draft(f.clock.now().plus(100)))
            .unwrap();
        f.engine
            .submit_evidence(p.id, owner, "proof with enough characters")
            .unwrap();
        promises.push(p.id);
    }

    // Two different promises of the same owner complete from two threads;
    // the user-row version check plus retry keeps both rewards.
    let e1 = Arc::clone(&f.engine);
    let e2 = Arc::clone(&f.engine);
    let (p1, p2) = (promises[0], promises[1]);
    let t1 = thread::spawn(move || e1.vouch(p1, a).unwrap());
    let t2 = thread::spawn(move || e2.vouch(p2, b).unwrap());
    assert!(t1.join().unwrap().completed);
    assert!(t2.join().unwrap().completed);

    let rewarded = f.store.get_user(owner).unwrap();
    assert_eq!(rewarded.total_completed, 2);
    assert_eq!(rewarded.reputation, 30);
    assert_eq!(rewarded.coins, 200);
}

#[test]
fn sweep_in_pending_approval_also_penalizes() {
    let f = fixture();
    let owner = seed_user(&f.store, 1, 10);
    let validator = seed_user(&f.store, 2, 10);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(10)))
        .unwrap();
    f.engine
        .submit_evidence(promise.id, owner, "proof with enough characters")
        .unwrap();
    f.engine.vouch(promise.id, validator).unwrap();

    f.clock.advance(60);
    let sweeper = DeadlineSweeper::new(Arc::clone(&f.engine));
    let report = sweeper.run_once(f.clock.now());
    assert_eq!(report.failed, 1);

    let stored = f.engine.store().get_promise(promise.id).unwrap();
    assert_eq!(stored.status, PromiseStatus::Failed);
    let user = f.store.get_user(owner).unwrap();
    assert_eq!(user.reputation, 5);
    assert_eq!(user.total_failed, 1);
    // One vouch event, one failure event, no completion.
    assert_eq!(f.observer.completed_count(), 0);
    assert_eq!(f.observer.events().len(), 2);
}

#[test]
fn vouch_for_unknown_promise_or_validator_is_not_found() {
    let f = fixture();
    seed_user(&f.store, 1, 10);
    let err = f
        .engine
        .vouch(pact_types::PromiseId::new(99), UserId::new(1))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Store(_)));

    let owner = UserId::new(1);
    let promise = f
        .engine
        .create_promise(owner, &draft(f.clock.now().plus(100)))
        .unwrap();
    let err = f.engine.vouch(promise.id, UserId::new(42)).unwrap_err();
    assert!(matches!(err, LifecycleError::Store(_)));
}
