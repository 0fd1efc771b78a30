//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the engine (clock, live push) are abstracted
//! behind traits. This crate provides test-friendly implementations that
//! return deterministic values, can be controlled programmatically, and
//! never touch the wall clock or a real connection.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod sink;

pub use clock::NullClock;
pub use sink::NullSink;
