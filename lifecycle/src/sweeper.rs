//! Deadline sweeper — fails overdue promises.
//!
//! Query-then-transition: the expired-id query runs without locks, and
//! `sweep_expire` re-validates everything under the promise lock. A promise
//! completed by a racing vouch between the two steps shows up as
//! `InvalidState`, which is expected and swallowed. Failure on one promise
//! never aborts the batch.

use crate::error::LifecycleError;
use crate::machine::LifecycleEngine;
use pact_store::PromiseStore;
use pact_types::Timestamp;
use pact_utils::format_duration;
use std::sync::Arc;

/// What one sweep pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Promises the expiry query returned.
    pub examined: usize,
    /// Promises driven to `Failed`.
    pub failed: usize,
    /// Promises that a racing transition moved first (expected, swallowed).
    pub raced: usize,
    /// Promises skipped on an unexpected error (logged, not escalated).
    pub errors: usize,
}

/// Drives overdue promises to `Failed` through the state machine.
pub struct DeadlineSweeper {
    engine: Arc<LifecycleEngine>,
}

impl DeadlineSweeper {
    pub fn new(engine: Arc<LifecycleEngine>) -> Self {
        Self { engine }
    }

    /// One sweep pass over everything overdue at `now`.
    pub fn run_once(&self, now: Timestamp) -> SweepReport {
        let mut report = SweepReport::default();

        let ids = match self.engine.store().expired_promises(now) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, "expiry query failed, skipping sweep pass");
                report.errors += 1;
                return report;
            }
        };
        report.examined = ids.len();

        for id in ids {
            match self.engine.sweep_expire(id, now) {
                Ok(promise) => {
                    report.failed += 1;
                    tracing::info!(
                        promise = %id,
                        overdue = %format_duration(promise.deadline.elapsed_since(now)),
                        "swept overdue promise"
                    );
                }
                Err(LifecycleError::InvalidState { status }) => {
                    report.raced += 1;
                    tracing::debug!(promise = %id, %status, "promise moved before the sweep reached it");
                }
                Err(LifecycleError::NotExpired { .. }) => {
                    // Only reachable if the store's expiry query and the
                    // machine disagree on the clock; treat like a race.
                    report.raced += 1;
                }
                Err(e) => {
                    report.errors += 1;
                    tracing::warn!(promise = %id, error = %e, "sweep failed for promise, continuing");
                }
            }
        }

        if report.examined > 0 {
            tracing::info!(
                examined = report.examined,
                failed = report.failed,
                raced = report.raced,
                errors = report.errors,
                "sweep pass finished"
            );
        }
        report
    }
}
