use crate::store::Mutate;
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

/// Business arguments passed to a transmitter's first stage.
pub type Args = Vec<Value>;

/// A boxed, sendable future with no output.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

type Effect = Box<dyn FnOnce(Mutate) -> Dispatch + Send>;
type Stage = dyn Fn(Args) -> Effect + Send + Sync;

/// What a transmitter's effect stage hands back.
///
/// Awaiting a `Dispatch` waits for the asynchronous part of the effect, if
/// any. A transmitter may call `mutate` any number of times before and
/// during that future.
pub enum Dispatch {
    /// The effect finished synchronously.
    Done,
    /// The effect continues in this future.
    Pending(BoxFuture),
}

impl Dispatch {
    /// Wrap the asynchronous part of an effect.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Dispatch::Pending(Box::pin(future))
    }

    /// Whether there is still work to await.
    pub fn is_pending(&self) -> bool {
        matches!(self, Dispatch::Pending(_))
    }
}

impl From<()> for Dispatch {
    fn from(_: ()) -> Self {
        Dispatch::Done
    }
}

impl IntoFuture for Dispatch {
    type Output = ();
    type IntoFuture = BoxFuture;

    fn into_future(self) -> BoxFuture {
        match self {
            Dispatch::Done => Box::pin(std::future::ready(())),
            Dispatch::Pending(future) => future,
        }
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Done => f.write_str("Done"),
            Dispatch::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// An externally authored two-stage effectful function.
///
/// # Examples
///
/// ```
/// use patchbay::{Store, Transmitter};
/// use serde_json::json;
///
/// let login = Transmitter::sync(|_args, mutate| {
///     mutate.update(json!({ "loggedIn": true })).unwrap();
/// });
///
/// let store = Store::new(json!({ "loggedIn": false })).unwrap();
/// let effect = login.stage(vec![]);
/// let _ = effect(store.mutate());
/// assert_eq!(store.snapshot()["loggedIn"], json!(true));
/// ```
#[derive(Clone)]
pub struct Transmitter {
    stage: Arc<Stage>,
}

impl Transmitter {
    /// Build from the raw two-stage form `args -> mutate -> dispatch`.
    pub fn new<F, E>(f: F) -> Self
    where
        F: Fn(Args) -> E + Send + Sync + 'static,
        E: FnOnce(Mutate) -> Dispatch + Send + 'static,
    {
        Self {
            stage: Arc::new(move |args: Args| Box::new(f(args)) as Effect),
        }
    }

    /// A transmitter whose effect completes synchronously.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(Args, &Mutate) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::new(move |args: Args| {
            let f = Arc::clone(&f);
            move |mutate: Mutate| {
                f(args, &mutate);
                Dispatch::Done
            }
        })
    }

    /// A transmitter whose effect is an async block.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(Args, Mutate) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let f = Arc::new(f);
        Self::new(move |args: Args| {
            let f = Arc::clone(&f);
            move |mutate: Mutate| Dispatch::pending(f(args, mutate))
        })
    }

    /// Run the first stage, returning the effect awaiting a `Mutate`.
    pub fn stage(&self, args: Args) -> impl FnOnce(Mutate) -> Dispatch + Send {
        (self.stage)(args)
    }
}

impl fmt::Debug for Transmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transmitter(..)")
    }
}

/// Named transmitters handed to `connect`.
#[derive(Clone, Debug, Default)]
pub struct Transmitters {
    entries: BTreeMap<String, Transmitter>,
}

impl Transmitters {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transmitter, builder style.
    pub fn with(mut self, name: impl Into<String>, transmitter: Transmitter) -> Self {
        self.insert(name, transmitter);
        self
    }

    /// Add or replace a transmitter.
    pub fn insert(&mut self, name: impl Into<String>, transmitter: Transmitter) -> Option<Transmitter> {
        self.entries.insert(name.into(), transmitter)
    }

    /// The transmitter registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Transmitter> {
        self.entries.get(name)
    }

    /// Iterate over `(name, transmitter)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Transmitter> {
        self.entries.iter()
    }

    /// Number of registered transmitters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Transmitter)> for Transmitters {
    fn from_iter<I: IntoIterator<Item = (K, Transmitter)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, t)| (name.into(), t)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Transmitters {
    type Item = (&'a String, &'a Transmitter);
    type IntoIter = btree_map::Iter<'a, String, Transmitter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
