//! The global state container.
//!
//! A [`Store`] owns the single state snapshot of an application. [`Mutate`]
//! is the update entrypoint handed to transmitters, and a [`Subscription`]
//! keeps a notification callback registered for as long as it lives.

mod mutate;
mod store;

pub use mutate::Mutate;
pub use store::{Store, StoreBuilder, Subscription};
