//! Global state values.
//!
//! State is a schema-free mapping from string keys to JSON values. A
//! [`Snapshot`] is an immutable view of that mapping at one commit, and an
//! [`UpdatePayload`] describes how the next commit is derived from it.

mod payload;
mod snapshot;

pub use payload::{IntoPayload, UpdatePayload};
pub use snapshot::Snapshot;

/// The global state mapping: top-level keys to values of any shape.
pub type StateMap = serde_json::Map<String, serde_json::Value>;
