//! Property tests: random operation sequences never drive a promise along
//! an edge the lifecycle does not define, and terminal states never mutate.

use std::sync::Arc;

use proptest::prelude::*;

use pact_lifecycle::LifecycleEngine;
use pact_nullables::NullClock;
use pact_store::{PromiseStore, Store, UserStore};
use pact_store_mem::MemStore;
use pact_types::{
    PactParams, PromiseDraft, PromiseStatus, Timestamp, UserId, UserRecord,
};

const DEADLINE: u64 = 10_000;

#[derive(Clone, Debug)]
enum Op {
    /// Owner submits a report of the given length.
    Submit { len: usize },
    /// A stranger submits (must always be rejected).
    SubmitByStranger,
    /// User `idx` vouches (idx 0 is the owner).
    Vouch { idx: usize },
    /// Sweep with `now` before the deadline.
    SweepEarly,
    /// Sweep with `now` after the deadline.
    SweepLate,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..20).prop_map(|len| Op::Submit { len }),
        Just(Op::SubmitByStranger),
        (0usize..5).prop_map(|idx| Op::Vouch { idx }),
        Just(Op::SweepEarly),
        Just(Op::SweepLate),
    ]
}

/// The edges the lifecycle defines, plus self-loops (rejected attempts).
fn edge_is_legal(from: PromiseStatus, to: PromiseStatus) -> bool {
    use PromiseStatus::*;
    match (from, to) {
        (a, b) if a == b => true,
        (Pending, PendingApproval) => true,
        (PendingApproval, Completed) => true,
        (Pending, Failed) | (PendingApproval, Failed) => true,
        _ => false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_sequences_only_take_legal_edges(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let store = Arc::new(MemStore::new());
        let clock = Arc::new(NullClock::new(0));
        let engine = LifecycleEngine::new(
            Arc::clone(&store) as Arc<dyn Store>,
            Arc::clone(&clock) as _,
            PactParams::default(),
        );

        // User 0 owns the promise; 1..=4 are potential validators; 5 is the
        // stranger who keeps trying to submit evidence.
        for id in 0..=5u64 {
            store.put_user(&UserRecord::new(UserId::new(id))).unwrap();
        }
        let owner = UserId::new(0);
        let promise = engine
            .create_promise(owner, &PromiseDraft {
                title: "property promise".into(),
                description: String::new(),
                reward: String::new(),
                penalty: String::new(),
                deadline: Timestamp::new(DEADLINE),
            })
            .unwrap();

        let mut status = PromiseStatus::Pending;
        for op in &ops {
            match op {
                Op::Submit { len } => {
                    let report = "x".repeat(*len);
                    let _ = engine.submit_evidence(promise.id, owner, &report);
                }
                Op::SubmitByStranger => {
                    let result = engine.submit_evidence(
                        promise.id,
                        UserId::new(5),
                        "definitely long enough evidence",
                    );
                    prop_assert!(result.is_err());
                }
                Op::Vouch { idx } => {
                    let _ = engine.vouch(promise.id, UserId::new(*idx as u64));
                }
                Op::SweepEarly => {
                    let result = engine.sweep_expire(promise.id, Timestamp::new(DEADLINE - 1));
                    prop_assert!(result.is_err());
                }
                Op::SweepLate => {
                    let _ = engine.sweep_expire(promise.id, Timestamp::new(DEADLINE + 1));
                }
            }

            let next = store.get_promise(promise.id).unwrap().status;
            prop_assert!(
                edge_is_legal(status, next),
                "illegal edge {status} -> {next} after {op:?}"
            );
            status = next;
        }

        // Side effects match the terminal state exactly once, or not at all.
        let user = store.get_user(owner).unwrap();
        match status {
            PromiseStatus::Completed => {
                prop_assert_eq!(user.total_completed, 1);
                prop_assert_eq!(user.total_failed, 0);
                prop_assert_eq!(user.reputation, 20);
                prop_assert_eq!(user.coins, 150);
            }
            PromiseStatus::Failed => {
                prop_assert_eq!(user.total_completed, 0);
                prop_assert_eq!(user.total_failed, 1);
                prop_assert_eq!(user.reputation, 5);
                prop_assert_eq!(user.coins, 100);
            }
            _ => {
                prop_assert_eq!(user.total_completed, 0);
                prop_assert_eq!(user.total_failed, 0);
                prop_assert_eq!(user.reputation, 10);
                prop_assert_eq!(user.coins, 100);
            }
        }
    }
}
