//! Effectful actions and their binding to a store.
//!
//! A [`Transmitter`] is a two-stage function: the first stage takes the
//! business arguments, the second takes the store's [`Mutate`] entrypoint
//! and performs the effect, synchronously or as a future. [`bind`]
//! pre-applies the second stage so consumers can call actions by name.
//!
//! [`Mutate`]: crate::store::Mutate

mod binder;
mod transmitter;

pub use binder::{bind, BoundTransmitter, BoundTransmitters};
pub use transmitter::{Args, BoxFuture, Dispatch, Transmitter, Transmitters};
