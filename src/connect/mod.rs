//! Binding components to the store.
//!
//! A [`Provider`] owns the store and hands a [`Context`] down the tree.
//! [`connect`] wraps a [`Component`] so that each render derives its
//! [`Props`] from the store in that context: selected state, bound
//! transmitters and the `mutate` entrypoint, with the parent's own props
//! on top. [`Connected::mount`] keeps a connected component attached so it
//! re-renders after every commit.

mod component;
mod connected;
mod context;
mod mounted;
mod props;

pub use component::{component, parent, Component, FnComponent, ParentComponent};
pub use connected::{connect, connect_with, Connected};
pub use context::{Context, Provider};
pub use mounted::{Liveness, Mounted};
pub use props::{Prop, Props, MUTATE_KEY};
