use super::{Component, Connected, Context, Props};
use crate::error::{Error, Result};
use crate::store::Subscription;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Whether a mounted consumer is still attached.
///
/// Transmitters that outlive their consumer can check this before calling
/// `mutate`; nothing in the store does it for them.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Liveness(Arc::new(AtomicBool::new(true)))
    }

    /// `false` once the consumer has been unmounted or dropped.
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn kill(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// An output and the snapshot version it was rendered from.
struct Rendered<O> {
    version: u64,
    output: Arc<O>,
}

struct Slot<C: Component> {
    connected: Connected<C>,
    cx: Context,
    own: RwLock<Props>,
    latest: Mutex<Rendered<C::Output>>,
    error: Mutex<Option<Error>>,
    renders: AtomicUsize,
    alive: Liveness,
}

impl<C: Component> Slot<C> {
    fn rerender(&self) -> Result<()> {
        let own = self.own.read().clone();
        self.renders.fetch_add(1, Ordering::SeqCst);
        let (version, props) = self.connected.derive_at(&self.cx, own)?;
        let output = self.connected.inner().render(&self.cx, props)?;

        // A render that commits re-enters here and stores a newer output
        // before this one finishes.
        let mut latest = self.latest.lock();
        if version < latest.version {
            tracing::trace!(
                component = %self.connected.name(),
                version,
                latest = latest.version,
                "discarding output of an older snapshot"
            );
            return Ok(());
        }
        *latest = Rendered {
            version,
            output: Arc::new(output),
        };
        Ok(())
    }

    fn output(&self) -> Arc<C::Output> {
        Arc::clone(&self.latest.lock().output)
    }
}

/// A connected component attached to its store.
///
/// It re-derives its props and re-renders after every commit until it is
/// unmounted or dropped.
pub struct Mounted<C: Component> {
    slot: Arc<Slot<C>>,
    _subscription: Subscription,
}

impl<C> Connected<C>
where
    C: Component + 'static,
    C::Output: Send + Sync + 'static,
{
    /// Render once and subscribe to the store in `cx`.
    ///
    /// Errors from the first render are returned here, including
    /// [`Error::MissingProvider`].
    ///
    /// # Examples
    ///
    /// ```
    /// use patchbay::{connect, component, Props, Provider, StateMap};
    /// use serde_json::json;
    ///
    /// let provider = Provider::new(json!({ "count": 0 })).unwrap();
    /// let view = connect(component("Count", |props: &Props| props.value("count").cloned()));
    /// let mounted = view.mount(&provider.context(), StateMap::new()).unwrap();
    ///
    /// provider.store().update(json!({ "count": 1 })).unwrap();
    /// assert_eq!(mounted.output(), Some(json!(1)));
    /// assert_eq!(mounted.renders(), 2);
    /// ```
    pub fn mount(self, cx: &Context, own: impl Into<Props>) -> Result<Mounted<C>> {
        let own = own.into();
        let (version, props) = self.derive_at(cx, own.clone())?;
        let output = self.inner().render(cx, props)?;
        let store = cx.store().cloned().ok_or_else(|| Error::MissingProvider {
            component: self.name().to_string(),
        })?;

        let slot = Arc::new(Slot {
            connected: self,
            cx: cx.clone(),
            own: RwLock::new(own),
            latest: Mutex::new(Rendered {
                version,
                output: Arc::new(output),
            }),
            error: Mutex::new(None),
            renders: AtomicUsize::new(1),
            alive: Liveness::new(),
        });

        let weak = Arc::downgrade(&slot);
        let subscription = store.subscribe(move |snapshot| {
            let Some(slot) = weak.upgrade() else {
                return;
            };
            if let Err(err) = slot.rerender() {
                tracing::error!(
                    component = %slot.connected.name(),
                    version = snapshot.version(),
                    error = %err,
                    "re-render after commit failed"
                );
                *slot.error.lock() = Some(err);
            }
        });

        tracing::debug!(component = %slot.connected.name(), store = %store.label(), "mounted");
        Ok(Mounted {
            slot,
            _subscription: subscription,
        })
    }
}

impl<C: Component> Mounted<C> {
    /// Read the latest output.
    ///
    /// `f` runs with no lock held, so it may call actions that commit. It
    /// keeps seeing the output it was handed.
    pub fn with_output<R>(&self, f: impl FnOnce(&C::Output) -> R) -> R {
        let output = self.slot.output();
        f(output.as_ref())
    }

    /// How many times the component has been evaluated, the first render
    /// included.
    pub fn renders(&self) -> usize {
        self.slot.renders.load(Ordering::SeqCst)
    }

    /// Replace the parent's props and re-render.
    pub fn set_props(&self, own: impl Into<Props>) -> Result<()> {
        *self.slot.own.write() = own.into();
        self.slot.rerender()
    }

    /// Re-render now, returning any error directly.
    pub fn rerender(&self) -> Result<()> {
        self.slot.rerender()
    }

    /// The error from the most recent failed re-render after a commit.
    ///
    /// When a re-render fails the previous output is kept.
    pub fn take_error(&self) -> Option<Error> {
        self.slot.error.lock().take()
    }

    /// A flag that turns false when this consumer detaches.
    pub fn liveness(&self) -> Liveness {
        self.slot.alive.clone()
    }

    /// Detach from the store.
    pub fn unmount(self) {}
}

impl<C> Mounted<C>
where
    C: Component,
    C::Output: Clone,
{
    /// A copy of the latest output.
    pub fn output(&self) -> C::Output {
        self.slot.output().as_ref().clone()
    }
}

impl<C: Component> Drop for Mounted<C> {
    fn drop(&mut self) {
        self.slot.alive.kill();
        tracing::debug!(component = %self.slot.connected.name(), "unmounted");
    }
}
