//! # Patchbay
//!
//! A single global state store with a binding layer for tree-positioned
//! consumers.
//!
//! Patchbay is organised in two layers:
//!
//! ## Store (state container)
//!
//! - `Store` - Owns the one state snapshot; `update` is the only way to change it
//! - `Snapshot` - Immutable view of the state at one commit
//! - Shallow merge of partial objects or of a function of the previous state
//! - Every commit notifies every subscriber, with no batching
//!
//! ## Connect (binding layer)
//!
//! - `Provider` / `Context` - Hands the store down the consumer tree
//! - `Selector` - Projects the slice of state a consumer needs
//! - `Transmitter` - Two-stage effectful action, bound to the store's `Mutate`
//! - `connect` - Derives a component's props from all of the above
//!
//! ```
//! use patchbay::{connect, component, Props, Provider, Selector, StateMap};
//! use serde_json::json;
//!
//! let provider = Provider::new(json!({
//!     "session": { "loggedIn": false },
//!     "settings": { "theme": "dark" },
//! }))
//! .unwrap();
//!
//! let status = connect(component("Status", |props: &Props| {
//!     props.value("loggedIn").cloned()
//! }))
//! .with_selector(Selector::key("session"));
//!
//! let mounted = status.mount(&provider.context(), StateMap::new()).unwrap();
//! provider
//!     .store()
//!     .update(json!({ "session": { "loggedIn": true } }))
//!     .unwrap();
//! assert_eq!(mounted.output(), Some(json!(true)));
//! ```

pub mod connect;
pub mod error;
pub mod select;
pub mod state;
pub mod store;
pub mod transmit;

// Re-export main types for convenience
pub use connect::{
    component, connect, connect_with, parent, Component, Connected, Context, Liveness, Mounted,
    Prop, Props, Provider,
};
pub use error::{Error, Result};
pub use select::Selector;
pub use state::{IntoPayload, Snapshot, StateMap, UpdatePayload};
pub use store::{Mutate, Store, StoreBuilder, Subscription};
pub use transmit::{bind, Args, BoundTransmitter, BoundTransmitters, Dispatch, Transmitter, Transmitters};
