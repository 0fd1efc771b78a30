//! Fundamental types for the PACT engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: ids, timestamps, the promise/validation/notification records,
//! status enums, and the tunable engine parameters.

pub mod id;
pub mod notification;
pub mod params;
pub mod promise;
pub mod time;
pub mod user;
pub mod validation;

pub use id::{NotificationId, PromiseId, UserId, ValidationId};
pub use notification::{NotificationKind, NotificationRecord};
pub use params::{PactParams, ParamsError};
pub use promise::{PromiseDraft, PromiseRecord, PromiseStatus};
pub use time::{Clock, SystemClock, Timestamp};
pub use user::UserRecord;
pub use validation::ValidationRecord;
