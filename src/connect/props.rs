use crate::state::StateMap;
use crate::store::Mutate;
use crate::transmit::{Args, BoundTransmitter, BoundTransmitters, Dispatch};
use serde_json::Value;
use std::collections::BTreeSet;

/// Key under which a connected component receives its store entrypoint.
pub const MUTATE_KEY: &str = "mutate";

/// A resolved prop.
#[derive(Clone, Copy, Debug)]
pub enum Prop<'a> {
    /// The store entrypoint.
    Mutate(&'a Mutate),
    /// Plain data, from selected state or own props.
    Value(&'a Value),
    /// A bound transmitter.
    Action(&'a BoundTransmitter),
}

/// The props a component renders with.
///
/// Connected components receive four layers: the `mutate` entrypoint,
/// then the selected state, then the bound transmitters, then the props
/// passed in by the parent. On a key collision the later layer wins, so a
/// parent can always override what the store supplies.
///
/// The parent's layer is whatever its `Props` resolved to, so data,
/// actions and an entrypoint handed down by an outer connector all reach
/// the inner component.
///
/// # Examples
///
/// ```
/// use patchbay::{connect, component, Props, Provider, Selector};
/// use serde_json::json;
///
/// let provider = Provider::new(json!({ "title": "from store", "count": 1 })).unwrap();
/// let view = connect(component("View", |props: &Props| props.values()));
///
/// let values = provider
///     .render(&view, Props::new().with("title", json!("from parent")))
///     .unwrap();
///
/// assert_eq!(values["title"], json!("from parent"));
/// assert_eq!(values["count"], json!(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Props {
    mutate: Option<Mutate>,
    selected: StateMap,
    actions: BoundTransmitters,
    // The parent's layer. A key lives in at most one of these three.
    own: StateMap,
    own_actions: BoundTransmitters,
    own_mutate: Option<Mutate>,
}

impl Props {
    /// No props at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Props made only of data passed in by a parent.
    pub fn from_own(own: StateMap) -> Self {
        Self {
            own,
            ..Self::default()
        }
    }

    /// Lay the store-derived layers under `incoming`.
    pub(crate) fn connected(
        mutate: Mutate,
        selected: StateMap,
        actions: BoundTransmitters,
        incoming: Props,
    ) -> Self {
        let mut props = Self {
            mutate: Some(mutate),
            selected,
            actions,
            ..Self::default()
        };

        for key in incoming.keys() {
            match incoming.get(key) {
                Some(Prop::Value(value)) => {
                    props.own.insert(key.to_string(), value.clone());
                }
                Some(Prop::Action(action)) => props.own_actions.insert(key, action.clone()),
                Some(Prop::Mutate(mutate)) => props.own_mutate = Some(mutate.clone()),
                None => {}
            }
        }
        props
    }

    /// Add an own prop, builder style.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        self.clear_own(&key);
        self.own.insert(key, value);
        self
    }

    /// Pass an action down under `key`, builder style.
    ///
    /// ```
    /// use patchbay::{connect, component, Props, Provider, Transmitter, Transmitters};
    /// use serde_json::json;
    ///
    /// let provider = Provider::new(json!({ "saved": false })).unwrap();
    /// let save = Transmitter::sync(|_args, mutate| {
    ///     mutate.update(json!({ "saved": true })).unwrap();
    /// });
    /// let form = connect(component("Form", |props: &Props| props.clone()))
    ///     .with_transmitters(Transmitters::new().with("save", save));
    /// let form_props = provider.render(&form, Props::new()).unwrap();
    ///
    /// let button = component("Button", |props: &Props| props.call("onClick", vec![]).is_some());
    /// let props = Props::new().with_action("onClick", form_props.action("save").unwrap().clone());
    /// assert!(provider.render(&button, props).unwrap());
    /// assert_eq!(provider.store().snapshot()["saved"], json!(true));
    /// ```
    pub fn with_action(mut self, key: impl Into<String>, action: BoundTransmitter) -> Self {
        let key = key.into();
        self.clear_own(&key);
        self.own_actions.insert(key, action);
        self
    }

    fn clear_own(&mut self, key: &str) {
        self.own.remove(key);
        self.own_actions.remove(key);
        if key == MUTATE_KEY {
            self.own_mutate = None;
        }
    }

    /// Resolve `key` across all layers.
    pub fn get(&self, key: &str) -> Option<Prop<'_>> {
        if let Some(value) = self.own.get(key) {
            return Some(Prop::Value(value));
        }
        if let Some(action) = self.own_actions.get(key) {
            return Some(Prop::Action(action));
        }
        if let Some(mutate) = self.own_mutate.as_ref().filter(|_| key == MUTATE_KEY) {
            return Some(Prop::Mutate(mutate));
        }
        if let Some(action) = self.actions.get(key) {
            return Some(Prop::Action(action));
        }
        if let Some(value) = self.selected.get(key) {
            return Some(Prop::Value(value));
        }
        match &self.mutate {
            Some(mutate) if key == MUTATE_KEY => Some(Prop::Mutate(mutate)),
            _ => None,
        }
    }

    /// The data prop under `key`, if that is what wins.
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.get(key)? {
            Prop::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The action under `key`, if that is what wins.
    pub fn action(&self, key: &str) -> Option<&BoundTransmitter> {
        match self.get(key)? {
            Prop::Action(action) => Some(action),
            _ => None,
        }
    }

    /// The store entrypoint, unless another layer overrides `mutate`.
    pub fn mutate(&self) -> Option<&Mutate> {
        match self.get(MUTATE_KEY)? {
            Prop::Mutate(mutate) => Some(mutate),
            _ => None,
        }
    }

    /// Call the action under `name`. `None` if no action wins that key.
    pub fn call(&self, name: &str, args: Args) -> Option<Dispatch> {
        self.action(name).map(|action| action.call(args))
    }

    /// Every key that resolves to something.
    pub fn keys(&self) -> BTreeSet<&str> {
        let mut keys = BTreeSet::new();
        if self.mutate.is_some() || self.own_mutate.is_some() {
            keys.insert(MUTATE_KEY);
        }
        keys.extend(self.selected.keys().map(String::as_str));
        keys.extend(self.actions.names());
        keys.extend(self.own.keys().map(String::as_str));
        keys.extend(self.own_actions.names());
        keys
    }

    /// Whether `key` resolves in any layer.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All data props after precedence is applied.
    ///
    /// Keys won by an action or by the entrypoint are left out.
    pub fn values(&self) -> StateMap {
        self.keys()
            .into_iter()
            .filter_map(|key| match self.get(key)? {
                Prop::Value(value) => Some((key.to_string(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Data passed in by the parent, before precedence.
    pub fn own(&self) -> &StateMap {
        &self.own
    }

    /// The selector's output, before precedence.
    pub fn selected(&self) -> &StateMap {
        &self.selected
    }

    /// Transmitters bound by this component's own connector.
    pub fn actions(&self) -> &BoundTransmitters {
        &self.actions
    }
}

impl From<StateMap> for Props {
    fn from(own: StateMap) -> Self {
        Self::from_own(own)
    }
}
