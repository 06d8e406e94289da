use super::{Snapshot, StateMap};
use crate::error::{kind_of, Error, Result};
use serde_json::Value;
use std::fmt;

type Compute = Box<dyn FnOnce(&Snapshot) -> StateMap + Send>;

/// Describes how the next commit is derived from the current snapshot.
pub enum UpdatePayload {
    /// Top-level keys to shallow-merge into the state.
    Partial(StateMap),
    /// A pure function of the previous snapshot returning the keys to merge.
    Compute(Compute),
}

impl UpdatePayload {
    /// Wrap a function payload.
    pub fn compute<F>(f: F) -> Self
    where
        F: FnOnce(&Snapshot) -> StateMap + Send + 'static,
    {
        UpdatePayload::Compute(Box::new(f))
    }

    /// Accept a dynamic payload; only objects are valid.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(partial) => Ok(UpdatePayload::Partial(partial)),
            other => Err(Error::InvalidUpdatePayload {
                found: kind_of(&other),
            }),
        }
    }

    /// Produce the partial mapping to merge over `previous`.
    pub(crate) fn resolve(self, previous: &Snapshot) -> StateMap {
        match self {
            UpdatePayload::Partial(partial) => partial,
            UpdatePayload::Compute(f) => f(previous),
        }
    }
}

impl fmt::Debug for UpdatePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdatePayload::Partial(partial) => f.debug_tuple("Partial").field(partial).finish(),
            UpdatePayload::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

impl From<StateMap> for UpdatePayload {
    fn from(partial: StateMap) -> Self {
        UpdatePayload::Partial(partial)
    }
}

impl TryFrom<Value> for UpdatePayload {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        UpdatePayload::from_value(value)
    }
}

/// Anything `update` accepts as a payload.
pub trait IntoPayload {
    /// Convert into a payload, rejecting values that are not objects.
    fn into_payload(self) -> Result<UpdatePayload>;
}

impl IntoPayload for UpdatePayload {
    fn into_payload(self) -> Result<UpdatePayload> {
        Ok(self)
    }
}

impl IntoPayload for StateMap {
    fn into_payload(self) -> Result<UpdatePayload> {
        Ok(UpdatePayload::Partial(self))
    }
}

impl IntoPayload for Value {
    fn into_payload(self) -> Result<UpdatePayload> {
        UpdatePayload::from_value(self)
    }
}
