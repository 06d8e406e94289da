use super::Component;
use super::Props;
use crate::error::Result;
use crate::store::{Store, StoreBuilder};
use serde_json::Value;

/// The capability handed down a consumer tree.
///
/// A context either carries a store or it does not. It is built at the
/// composition root (usually by a [`Provider`]) and passed explicitly to
/// every render; there is no process-wide default.
#[derive(Clone, Debug, Default)]
pub struct Context {
    store: Option<Store>,
}

impl Context {
    /// A context with no store in reach.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A child context in which `store` shadows any outer store.
    pub fn provide(&self, store: &Store) -> Context {
        Context {
            store: Some(store.clone()),
        }
    }

    /// The nearest store, if any.
    pub fn store(&self) -> Option<&Store> {
        self.store.as_ref()
    }
}

/// Owns the application store and exposes it to a subtree of consumers.
///
/// # Examples
///
/// ```
/// use patchbay::{component, Props, Provider};
/// use serde_json::json;
///
/// let provider = Provider::new(json!({ "loggedIn": false })).unwrap();
/// let greeting = component("Greeting", |props: &Props| {
///     format!("hello {}", props.value("name").and_then(|v| v.as_str()).unwrap_or("?"))
/// });
///
/// let out = provider
///     .render(&greeting, Props::new().with("name", json!("ada")))
///     .unwrap();
/// assert_eq!(out, "hello ada");
/// ```
#[derive(Clone, Debug)]
pub struct Provider {
    store: Store,
}

impl Provider {
    /// Create the store from `initial`, which must be an object.
    pub fn new(initial: Value) -> Result<Self> {
        Ok(Self::from_store(Store::new(initial)?))
    }

    /// Configure the store before creating the provider.
    pub fn builder() -> StoreBuilder {
        Store::builder()
    }

    /// Provide an existing store.
    pub fn from_store(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The context to hand to descendants.
    pub fn context(&self) -> Context {
        Context::empty().provide(&self.store)
    }

    /// Render `child` inside this provider.
    pub fn render<C: Component>(&self, child: &C, props: Props) -> Result<C::Output> {
        child.render(&self.context(), props)
    }
}

impl From<Store> for Provider {
    fn from(store: Store) -> Self {
        Self::from_store(store)
    }
}
