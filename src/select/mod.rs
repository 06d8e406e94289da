//! Projections from the global state to the slice a consumer needs.

mod selector;

pub use selector::Selector;
