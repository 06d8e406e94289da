use crate::error::{BoxError, Error, Result};
use crate::state::{Snapshot, StateMap};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

type SelectFn = dyn Fn(&Snapshot) -> std::result::Result<StateMap, BoxError> + Send + Sync;

/// A pure projection from a snapshot to the keys a consumer receives.
///
/// Selectors must not have side effects; they run on every evaluation of a
/// connected component. Errors from fallible selectors are returned to the
/// caller as [`Error::Selector`], and panics are not caught.
///
/// # Examples
///
/// ```
/// use patchbay::{Selector, Store};
/// use serde_json::json;
///
/// let store = Store::new(json!({
///     "portion": { "a": 1 },
///     "rest": { "b": 2 },
/// }))
/// .unwrap();
///
/// let selected = Selector::key("portion").select(&store.snapshot()).unwrap();
/// assert_eq!(selected.get("a"), Some(&json!(1)));
/// assert!(selected.get("rest").is_none());
/// ```
#[derive(Clone)]
pub struct Selector {
    select: Arc<SelectFn>,
    label: &'static str,
}

impl Selector {
    fn labelled<F>(label: &'static str, f: F) -> Self
    where
        F: Fn(&Snapshot) -> std::result::Result<StateMap, BoxError> + Send + Sync + 'static,
    {
        Self {
            select: Arc::new(f),
            label,
        }
    }

    /// Pass the whole state through.
    pub fn identity() -> Self {
        Self::labelled("identity", |snapshot| Ok(snapshot.as_map().clone()))
    }

    /// Wrap an infallible projection.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Snapshot) -> StateMap + Send + Sync + 'static,
    {
        Self::labelled("custom", move |snapshot| Ok(f(snapshot)))
    }

    /// Wrap a projection that can fail.
    pub fn try_new<F, E>(f: F) -> Self
    where
        F: Fn(&Snapshot) -> std::result::Result<StateMap, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::labelled("custom", move |snapshot| f(snapshot).map_err(Into::into))
    }

    /// Project the object stored under `key`.
    ///
    /// A missing key, or a value that is not an object, selects nothing.
    pub fn key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::labelled("key", move |snapshot| match snapshot.get(&key) {
            Some(Value::Object(portion)) => Ok(portion.clone()),
            _ => Ok(StateMap::new()),
        })
    }

    /// Keep only the listed top-level keys.
    pub fn pick<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys = keys.into_iter().map(Into::into).collect::<BTreeSet<String>>();
        Self::labelled("pick", move |snapshot| {
            Ok(snapshot
                .iter()
                .filter(|(key, _)| keys.contains(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect())
        })
    }

    /// Apply the projection.
    pub fn select(&self, snapshot: &Snapshot) -> Result<StateMap> {
        (self.select)(snapshot).map_err(Error::Selector)
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.label).finish()
    }
}
