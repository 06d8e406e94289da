use super::Mutate;
use crate::error::{kind_of, Error, Result};
use crate::state::{IntoPayload, Snapshot, StateMap, UpdatePayload};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

type Subscriber = Arc<dyn Fn(&Snapshot) + Send + Sync>;

const DEFAULT_LABEL: &str = "store";

struct Inner {
    label: String,
    // Serializes commits. `current` is only locked for the swap itself, so
    // readers never wait on a function payload.
    writer: Mutex<()>,
    current: Mutex<Snapshot>,
    subscribers: RwLock<Vec<(usize, Subscriber)>>,
    next_id: AtomicUsize,
}

impl Inner {
    fn unsubscribe(&self, id: usize) {
        self.subscribers.write().retain(|(sub_id, _)| *sub_id != id);
        tracing::debug!(store = %self.label, subscription = id, "subscription removed");
    }
}

/// A thread-safe container for the global application state.
///
/// The store holds exactly one [`Snapshot`]. `update` is the only way to
/// replace it: every successful call commits a new snapshot and then
/// notifies every subscriber, once per call. There is no batching.
///
/// # Examples
///
/// ```
/// use patchbay::Store;
/// use serde_json::json;
///
/// let store = Store::new(json!({ "loggedIn": false })).unwrap();
/// store.update(json!({ "loggedIn": true })).unwrap();
/// assert_eq!(store.snapshot(), json!({ "loggedIn": true }));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    /// Create a store from an initial state object.
    ///
    /// Fails with [`Error::MissingInitialState`] unless `initial` is an
    /// object.
    pub fn new(initial: Value) -> Result<Self> {
        Self::builder().initial_state(initial).build()
    }

    /// Create a store from any serializable value that serializes to a map.
    pub fn from_serialize<T: Serialize + ?Sized>(initial: &T) -> Result<Self> {
        Self::new(serde_json::to_value(initial)?)
    }

    /// Start configuring a store.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// The label used in log events.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.current.lock().clone()
    }

    /// Read the current state without cloning the snapshot handle.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StateMap) -> R,
    {
        let current = self.inner.current.lock();
        f(current.as_map())
    }

    /// Shallow-merge a payload into the state and notify subscribers.
    ///
    /// Objects (and [`UpdatePayload`] values) are accepted; any other JSON
    /// value fails with [`Error::InvalidUpdatePayload`] and leaves the state
    /// and subscribers untouched. Returns the committed snapshot.
    pub fn update<P: IntoPayload>(&self, payload: P) -> Result<Snapshot> {
        let payload = self.accept(payload)?;
        Ok(self.commit(payload))
    }

    /// Update with a function of the previous snapshot.
    ///
    /// `f` runs while other commits wait, so it always sees the snapshot it
    /// replaces. It may read this store but must not update it.
    pub fn update_with<F>(&self, f: F) -> Snapshot
    where
        F: FnOnce(&Snapshot) -> StateMap + Send + 'static,
    {
        self.commit(UpdatePayload::compute(f))
    }

    /// Update, then run `callback` once with the committed snapshot.
    ///
    /// The callback runs after every subscriber has been notified. It does
    /// not run when the payload is rejected.
    pub fn update_then<P, C>(&self, payload: P, callback: C) -> Result<Snapshot>
    where
        P: IntoPayload,
        C: FnOnce(&Snapshot),
    {
        let committed = self.update(payload)?;
        callback(&committed);
        Ok(committed)
    }

    /// Subscribe to commits.
    ///
    /// The callback runs after every commit with the new snapshot, until
    /// the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.subscribers.write().push((id, Arc::new(callback)));
        tracing::debug!(store = %self.inner.label, subscription = id, "subscription added");

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// The update entrypoint for this store.
    pub fn mutate(&self) -> Mutate {
        Mutate::new(self.clone())
    }

    /// Whether both handles refer to the same store.
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn accept<P: IntoPayload>(&self, payload: P) -> Result<UpdatePayload> {
        payload.into_payload().inspect_err(|err| {
            tracing::warn!(store = %self.inner.label, error = %err, "update rejected");
        })
    }

    fn commit(&self, payload: UpdatePayload) -> Snapshot {
        let committed = {
            let _writer = self.inner.writer.lock();
            let prev = self.snapshot();
            let partial = payload.resolve(&prev);
            let keys = partial.keys().cloned().collect::<Vec<_>>();
            let next = prev.merge(partial);
            *self.inner.current.lock() = next.clone();
            tracing::trace!(
                store = %self.inner.label,
                version = next.version(),
                keys = ?keys,
                "update committed"
            );
            next
        };
        self.notify(&committed);
        committed
    }

    /// Notify all subscribers of a commit.
    ///
    /// The subscriber list is copied first so callbacks may update or
    /// subscribe re-entrantly.
    fn notify(&self, snapshot: &Snapshot) {
        let subscribers = self
            .inner
            .subscribers
            .read()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect::<Vec<_>>();

        tracing::trace!(
            store = %self.inner.label,
            version = snapshot.version(),
            subscribers = subscribers.len(),
            "notifying subscribers"
        );

        for subscriber in subscribers {
            subscriber(snapshot);
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("label", &self.inner.label)
            .field("version", &self.snapshot().version())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Configuration for a [`Store`].
#[derive(Debug, Default)]
pub struct StoreBuilder {
    label: Option<String>,
    initial: Option<Value>,
}

impl StoreBuilder {
    /// Name the store in log events.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the initial state. It must be an object.
    pub fn initial_state(mut self, initial: Value) -> Self {
        self.initial = Some(initial);
        self
    }

    /// Build the store.
    pub fn build(self) -> Result<Store> {
        let label = self.label.unwrap_or_else(|| DEFAULT_LABEL.to_string());
        let state = match self.initial {
            Some(Value::Object(state)) => state,
            other => {
                let found = other.as_ref().map_or("nothing", kind_of);
                tracing::warn!(store = %label, found, "initial state rejected");
                return Err(Error::MissingInitialState { found });
            }
        };

        tracing::debug!(store = %label, keys = state.len(), "store created");
        Ok(Store {
            inner: Arc::new(Inner {
                label,
                writer: Mutex::new(()),
                current: Mutex::new(Snapshot::initial(state)),
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicUsize::new(0),
            }),
        })
    }
}

/// RAII guard for a store subscription.
///
/// Dropping it removes the callback. It holds only a weak reference, so it
/// never keeps the store alive.
pub struct Subscription {
    id: usize,
    store: Weak<Inner>,
}

impl Subscription {
    /// Remove the callback now.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}
