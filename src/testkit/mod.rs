//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`node`] — [`ScriptedNode`](node::ScriptedNode), a mock
//!   [`StorageNode`](crate::node::StorageNode) with scripted responses and
//!   per-method call counters.
//! - [`progress`] — [`RecordingSink`](progress::RecordingSink), a progress
//!   sink that records every narration event for assertions.

pub mod node;
pub mod progress;
