use super::Store;
use crate::error::Result;
use crate::state::{IntoPayload, Snapshot, StateMap};
use std::fmt;

/// The update entrypoint of one store.
///
/// This is what transmitters receive as their second-stage argument and
/// what connected components see under the `mutate` prop. It always writes
/// to the store it was taken from.
#[derive(Clone)]
pub struct Mutate {
    store: Store,
}

impl Mutate {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    /// See [`Store::update`].
    pub fn update<P: IntoPayload>(&self, payload: P) -> Result<Snapshot> {
        self.store.update(payload)
    }

    /// See [`Store::update_with`].
    pub fn update_with<F>(&self, f: F) -> Snapshot
    where
        F: FnOnce(&Snapshot) -> StateMap + Send + 'static,
    {
        self.store.update_with(f)
    }

    /// See [`Store::update_then`].
    pub fn update_then<P, C>(&self, payload: P, callback: C) -> Result<Snapshot>
    where
        P: IntoPayload,
        C: FnOnce(&Snapshot),
    {
        self.store.update_then(payload, callback)
    }

    /// The target store's current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Whether this entrypoint writes to `store`.
    pub fn targets(&self, store: &Store) -> bool {
        self.store.ptr_eq(store)
    }
}

impl fmt::Debug for Mutate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mutate").field(&self.store.label()).finish()
    }
}
