//! Numeric id newtypes for the four record families.
//!
//! Identity issuance is external; the engine only ever compares and stores
//! these ids, so they are opaque `u64` newtypes rather than open integers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_newtype!(
    /// Identifies a user record. Issued by the external identity subsystem.
    UserId
);
id_newtype!(
    /// Identifies a promise.
    PromiseId
);
id_newtype!(
    /// Identifies a single validation ("vouch") row.
    ValidationId
);
id_newtype!(
    /// Identifies a notification delivery record.
    NotificationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_ordered_by_raw_value() {
        assert!(PromiseId::new(1) < PromiseId::new(2));
        assert_eq!(UserId::new(7).as_u64(), 7);
    }

    #[test]
    fn display_is_the_raw_number() {
        assert_eq!(NotificationId::new(42).to_string(), "42");
    }
}
