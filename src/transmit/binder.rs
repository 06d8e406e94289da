use super::{Args, Dispatch, Transmitter, Transmitters};
use crate::store::Mutate;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// A transmitter with its second stage pre-applied to a store entrypoint.
#[derive(Clone)]
pub struct BoundTransmitter {
    name: String,
    raw: Transmitter,
    mutate: Mutate,
}

impl BoundTransmitter {
    /// Run both stages against the bound entrypoint.
    pub fn call(&self, args: Args) -> Dispatch {
        tracing::trace!(transmitter = %self.name, args = args.len(), "calling bound transmitter");
        let effect = self.raw.stage(args);
        effect(self.mutate.clone())
    }

    /// The name this transmitter was bound under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entrypoint this transmitter writes through.
    pub fn target(&self) -> &Mutate {
        &self.mutate
    }
}

impl fmt::Debug for BoundTransmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundTransmitter")
            .field("name", &self.name)
            .field("target", &self.mutate)
            .finish()
    }
}

/// Bound transmitters keyed by name.
#[derive(Clone, Debug, Default)]
pub struct BoundTransmitters {
    entries: BTreeMap<String, BoundTransmitter>,
}

impl BoundTransmitters {
    /// The transmitter bound under `name`.
    pub fn get(&self, name: &str) -> Option<&BoundTransmitter> {
        self.entries.get(name)
    }

    /// Whether anything is bound under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Bound names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, transmitter)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, BoundTransmitter> {
        self.entries.iter()
    }

    /// Number of bound transmitters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, action: BoundTransmitter) {
        self.entries.insert(key.into(), action);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<BoundTransmitter> {
        self.entries.remove(key)
    }
}

/// Bind every transmitter in `transmitters` to `mutate`.
///
/// Call this on every evaluation of a consumer: the result captures the
/// entrypoint it was given, so rebinding is what keeps actions pointed at
/// the live store.
pub fn bind(transmitters: &Transmitters, mutate: &Mutate) -> BoundTransmitters {
    let entries = transmitters
        .iter()
        .map(|(name, raw)| {
            let bound = BoundTransmitter {
                name: name.clone(),
                raw: raw.clone(),
                mutate: mutate.clone(),
            };
            (name.clone(), bound)
        })
        .collect();

    BoundTransmitters { entries }
}
