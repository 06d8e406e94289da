use super::{Context, Props};
use crate::error::Result;

/// A consumer positioned in a tree.
///
/// The host composes components by calling `render` with the context it
/// received from its parent. Plain components and connected components
/// implement the same trait and are interchangeable.
pub trait Component: Send + Sync {
    /// Whatever the host builds from a render.
    type Output;

    /// Render with `props`.
    fn render(&self, cx: &Context, props: Props) -> Result<Self::Output>;

    /// Name used in errors and log events.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A leaf component built from a closure over its props.
pub struct FnComponent<F> {
    name: String,
    render: F,
}

/// Build a leaf component.
pub fn component<F, O>(name: impl Into<String>, render: F) -> FnComponent<F>
where
    F: Fn(&Props) -> O + Send + Sync,
{
    FnComponent {
        name: name.into(),
        render,
    }
}

impl<F, O> Component for FnComponent<F>
where
    F: Fn(&Props) -> O + Send + Sync,
{
    type Output = O;

    fn render(&self, _cx: &Context, props: Props) -> Result<O> {
        Ok((self.render)(&props))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A component that renders children and therefore needs the context.
pub struct ParentComponent<F> {
    name: String,
    render: F,
}

/// Build a component that passes its context on to children.
///
/// # Examples
///
/// ```
/// use patchbay::{connect, component, parent, Component, Props, Provider, Selector};
/// use serde_json::json;
///
/// let provider = Provider::new(json!({ "user": { "name": "ada" } })).unwrap();
/// let badge = connect(component("Badge", |props: &Props| props.values()))
///     .with_selector(Selector::key("user"));
/// let page = parent("Page", move |cx, _props| badge.render(cx, Props::new()));
///
/// let rendered = provider.render(&page, Props::new()).unwrap();
/// assert_eq!(rendered["name"], json!("ada"));
/// ```
pub fn parent<F, O>(name: impl Into<String>, render: F) -> ParentComponent<F>
where
    F: Fn(&Context, &Props) -> Result<O> + Send + Sync,
{
    ParentComponent {
        name: name.into(),
        render,
    }
}

impl<F, O> Component for ParentComponent<F>
where
    F: Fn(&Context, &Props) -> Result<O> + Send + Sync,
{
    type Output = O;

    fn render(&self, cx: &Context, props: Props) -> Result<O> {
        (self.render)(cx, &props)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
