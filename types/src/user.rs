//! The trust/economy slice of a user.
//!
//! Identity (username, contact, credentials) is owned by the external
//! identity subsystem; the engine reads and writes only these numeric
//! fields, exclusively through the reputation ledger's apply functions.

use crate::id::UserId;
use serde::{Deserialize, Serialize};

/// Starting reputation for a new user.
pub const INITIAL_REPUTATION: i64 = 10;
/// Starting coin balance for a new user.
pub const INITIAL_COINS: i64 = 100;

/// A user's accumulated trust score and spendable balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    /// Trust score. Unbounded; may go negative (no floor is enforced here).
    pub reputation: i64,
    /// Spendable currency.
    pub coins: i64,
    /// Monotonic counter of completed promises.
    pub total_completed: u64,
    /// Monotonic counter of failed promises.
    pub total_failed: u64,
    /// Optimistic-concurrency version, bumped on every committed write.
    pub version: u64,
}

impl UserRecord {
    /// A fresh record with the starting reputation and balance.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            reputation: INITIAL_REPUTATION,
            coins: INITIAL_COINS,
            total_completed: 0,
            total_failed: 0,
            version: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults() {
        let u = UserRecord::new(UserId::new(1));
        assert_eq!(u.reputation, 10);
        assert_eq!(u.coins, 100);
        assert_eq!(u.total_completed, 0);
        assert_eq!(u.total_failed, 0);
        assert_eq!(u.version, 0);
    }
}
