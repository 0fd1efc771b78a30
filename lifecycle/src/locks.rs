//! Per-promise lock table.
//!
//! Serializes the read-check-write sequence of every operation touching one
//! promise, while keeping different promises fully independent. Entries are
//! dropped once a promise reaches a terminal state: a late writer recreates
//! the entry and then fails the status check, so serialization only ever
//! matters for live promises.

use pact_types::PromiseId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Map of promise id → lock cell.
pub struct LockTable {
    cells: Mutex<HashMap<PromiseId, Arc<Mutex<()>>>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, id: PromiseId) -> Arc<Mutex<()>> {
        let mut cells = self.cells.lock().expect("lock table mutex poisoned");
        Arc::clone(cells.entry(id).or_default())
    }

    /// Run `f` while holding the promise's lock.
    pub fn with_lock<T>(&self, id: PromiseId, f: impl FnOnce() -> T) -> T {
        let cell = self.cell(id);
        let _guard = cell.lock().expect("promise lock poisoned");
        f()
    }

    /// Drop the entry for a promise that can no longer transition.
    pub fn forget(&self, id: PromiseId) {
        self.cells
            .lock()
            .expect("lock table mutex poisoned")
            .remove(&id);
    }

    /// Number of live entries (for tests and introspection).
    pub fn len(&self) -> usize {
        self.cells.lock().expect("lock table mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LockTable {
    fn default() -> Self {
        Self::new()
    }
}
