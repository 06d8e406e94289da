use super::{Component, Context, Props};
use crate::error::{Error, Result};
use crate::select::Selector;
use crate::transmit::{bind, Transmitters};

/// A component whose props are derived from the store in its context.
///
/// Every evaluation reads the current snapshot, runs the selector, rebinds
/// the transmitters to the store's entrypoint and lays the parent's props
/// on top. Nothing is cached between evaluations.
pub struct Connected<C> {
    inner: C,
    selector: Selector,
    transmitters: Transmitters,
    name: String,
}

/// Connect `component` to the nearest store with the identity selector and
/// no transmitters.
///
/// # Examples
///
/// ```
/// use patchbay::{connect, component, Props, Provider, Transmitter, Transmitters};
/// use serde_json::json;
///
/// let provider = Provider::new(json!({ "loggedIn": false })).unwrap();
/// let login = Transmitter::sync(|_args, mutate| {
///     mutate.update(json!({ "loggedIn": true })).unwrap();
/// });
///
/// let button = connect(component("LoginButton", |props: &Props| {
///     if props.value("loggedIn") == Some(&json!(false)) {
///         let _ = props.call("login", vec![]);
///     }
/// }))
/// .with_transmitters(Transmitters::new().with("login", login));
///
/// provider.render(&button, Props::new()).unwrap();
/// assert_eq!(provider.store().snapshot()["loggedIn"], json!(true));
/// ```
pub fn connect<C: Component>(component: C) -> Connected<C> {
    connect_with(component, None, None)
}

/// Connect with an optional selector and an optional transmitter map.
pub fn connect_with<C: Component>(
    component: C,
    selector: Option<Selector>,
    transmitters: Option<Transmitters>,
) -> Connected<C> {
    let name = format!("Connected({})", component.name());
    Connected {
        inner: component,
        selector: selector.unwrap_or_default(),
        transmitters: transmitters.unwrap_or_default(),
        name,
    }
}

impl<C: Component> Connected<C> {
    /// Replace the selector.
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    /// Replace the transmitter map.
    pub fn with_transmitters(mut self, transmitters: Transmitters) -> Self {
        self.transmitters = transmitters;
        self
    }

    /// Override the name used in errors and log events.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The wrapped component.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Derive the props this component would render with right now.
    ///
    /// `incoming` is the top layer. A plain map of own props works, and so
    /// do the full props of an outer connected component.
    ///
    /// Fails with [`Error::MissingProvider`] when `cx` carries no store, and
    /// with [`Error::Selector`] when the selector fails.
    pub fn derive_props(&self, cx: &Context, incoming: impl Into<Props>) -> Result<Props> {
        self.derive_at(cx, incoming.into()).map(|(_, props)| props)
    }

    /// Like `derive_props`, also returning the version of the snapshot the
    /// props were derived from.
    pub(crate) fn derive_at(&self, cx: &Context, incoming: Props) -> Result<(u64, Props)> {
        let store = cx.store().ok_or_else(|| Error::MissingProvider {
            component: self.name.clone(),
        })?;

        let snapshot = store.snapshot();
        let selected = self.selector.select(&snapshot)?;
        let mutate = store.mutate();
        let actions = bind(&self.transmitters, &mutate);

        Ok((
            snapshot.version(),
            Props::connected(mutate, selected, actions, incoming),
        ))
    }
}

impl<C: Component> Component for Connected<C> {
    type Output = C::Output;

    fn render(&self, cx: &Context, props: Props) -> Result<C::Output> {
        let props = self.derive_props(cx, props)?;
        self.inner.render(cx, props)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
