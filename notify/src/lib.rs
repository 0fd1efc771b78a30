//! Notification fan-out.
//!
//! Consumes transition events from the lifecycle engine. For each event a
//! durable [`pact_types::NotificationRecord`] is appended (at-least-once:
//! a storage failure here is logged and swallowed, never propagated into
//! the transition that produced the event), then a best-effort live push
//! goes out through the [`NotificationSink`] if the recipient has a
//! registered connection.

pub mod directory;
pub mod fanout;
pub mod sink;

pub use directory::ConnectionDirectory;
pub use fanout::NotificationFanout;
pub use sink::{DirectorySink, NotificationSink};
