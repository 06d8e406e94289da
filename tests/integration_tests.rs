//! Integration tests for Patchbay

use patchbay::{
    component, connect, connect_with, parent, Component, Dispatch, Error, Mutate, Props, Provider,
    Selector, StateMap, Store, Transmitter, Transmitters,
};
use serde_json::{json, Value};
use std::future::IntoFuture;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

/// Flips a coin after a short delay and reports whether `guess` matched.
fn coinflip<D>(draw: D) -> Transmitter
where
    D: Fn() -> bool + Send + Sync + 'static,
{
    let draw = Arc::new(draw);
    Transmitter::new(move |args| {
        let guess = args.first().and_then(Value::as_bool).unwrap_or(true);
        let draw = Arc::clone(&draw);
        move |mutate: Mutate| {
            mutate.update(json!({ "result": "Flipping!!" })).unwrap();
            Dispatch::pending(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                let result = if draw() == guess { "YOU WON!" } else { "YOU LOST!" };
                mutate.update(json!({ "result": result })).unwrap();
            })
        }
    })
}

#[test]
fn login_scenario() {
    let store = Store::new(json!({ "loggedIn": false })).unwrap();

    store.update(json!({ "loggedIn": true })).unwrap();

    assert_eq!(store.snapshot(), json!({ "loggedIn": true }));
}

#[tokio::test]
async fn coinflip_reports_flipping_then_outcome() {
    let provider = Provider::new(json!({ "result": "" })).unwrap();
    let view = connect(component("Coin", |props: &Props| props.value("result").cloned()));
    let mounted = view.mount(&provider.context(), StateMap::new()).unwrap();
    let props = coin_props(&provider);

    let pending = props.call("win", vec![json!(true)]).unwrap();
    assert_eq!(mounted.output(), Some(json!("Flipping!!")));
    pending.await;
    assert_eq!(mounted.output(), Some(json!("YOU WON!")));

    let pending = props.call("lose", vec![json!(true)]).unwrap();
    assert_eq!(mounted.output(), Some(json!("Flipping!!")));
    pending.await;
    assert_eq!(mounted.output(), Some(json!("YOU LOST!")));
}

/// Props a connected component with both coin actions would see right now.
fn coin_props(provider: &Provider) -> Props {
    let view = connect(component("Probe", |props: &Props| props.clone())).with_transmitters(
        Transmitters::new()
            .with("win", coinflip(|| true))
            .with("lose", coinflip(|| false)),
    );
    provider.render(&view, Props::new()).unwrap()
}

#[tokio::test]
async fn coinflip_runs_on_a_spawned_task() {
    let store = Store::new(json!({})).unwrap();
    let flip = coinflip(|| false);

    let task = tokio::spawn(flip.stage(vec![json!(false)])(store.mutate()).into_future());
    task.await.unwrap();

    assert_eq!(store.snapshot()["result"], json!("YOU WON!"));
    assert_eq!(store.snapshot().version(), 2);
}

#[test]
fn selector_hides_unrelated_state() {
    let provider = Provider::new(json!({
        "portion": { "visible": 1, "also": 2 },
        "rest": { "hidden": 3 },
    }))
    .unwrap();
    let view = connect(component("Portion", |props: &Props| props.values()))
        .with_selector(Selector::key("portion"));

    let values = provider.render(&view, Props::new()).unwrap();

    assert_eq!(values, json!({ "visible": 1, "also": 2 }).as_object().cloned().unwrap());
    assert!(!values.contains_key("rest"));
    assert!(!values.contains_key("hidden"));
}

#[test]
fn derived_props_union_with_own_props_winning() {
    let provider = Provider::new(json!({ "a": 1, "b": 2, "save": "state" })).unwrap();
    let view = connect_with(
        component("Form", |props: &Props| props.clone()),
        None,
        Some(Transmitters::new().with("save", Transmitter::sync(|_, _| {}))),
    );

    let props = provider
        .render(&view, Props::new().with("b", json!("own")))
        .unwrap();

    assert_eq!(props.value("a"), Some(&json!(1)));
    assert_eq!(props.value("b"), Some(&json!("own")));
    assert!(props.action("save").is_some());
    assert!(props.mutate().unwrap().targets(provider.store()));
    assert_eq!(
        props.keys().into_iter().collect::<Vec<_>>(),
        vec!["a", "b", "mutate", "save"]
    );
}

#[test]
fn n_updates_make_n_commits_and_n_notifications() {
    let provider = Provider::new(json!({ "count": 0 })).unwrap();
    let store = provider.store().clone();

    let notified = Arc::new(AtomicUsize::new(0));
    let notified_clone = notified.clone();
    let _sub = store.subscribe(move |_| {
        notified_clone.fetch_add(1, Ordering::SeqCst);
    });
    let mounted = connect(component("Count", |props: &Props| props.value("count").cloned()))
        .mount(&provider.context(), StateMap::new())
        .unwrap();

    const N: usize = 25;
    for _ in 0..N {
        store.update_with(|prev| {
            let count = prev.get_as::<usize>("count").unwrap_or(0);
            let mut next = StateMap::new();
            next.insert("count".to_string(), json!(count + 1));
            next
        });
    }

    assert_eq!(store.snapshot().version(), N as u64);
    assert_eq!(notified.load(Ordering::SeqCst), N);
    assert_eq!(mounted.renders(), N + 1);
    assert_eq!(mounted.output(), Some(json!(N)));
}

#[test]
fn rebinding_follows_the_provider_in_context() {
    let first = Provider::new(json!({ "hits": 0 })).unwrap();
    let second = Provider::new(json!({ "hits": 0 })).unwrap();
    let hit = Transmitter::sync(|_, mutate| {
        mutate.update(json!({ "hits": 1 })).unwrap();
    });
    let view = connect(component("Hit", |props: &Props| props.clone()))
        .with_transmitters(Transmitters::new().with("hit", hit));

    let bound_first = first.render(&view, Props::new()).unwrap();
    let bound_second = second.render(&view, Props::new()).unwrap();

    assert!(bound_first.action("hit").unwrap().target().targets(first.store()));
    assert!(bound_second.action("hit").unwrap().target().targets(second.store()));

    let _ = bound_second.call("hit", vec![]);
    assert_eq!(first.store().snapshot()["hits"], json!(0));
    assert_eq!(second.store().snapshot()["hits"], json!(1));
}

#[test]
fn tree_renders_through_parents() {
    let provider = Provider::new(json!({
        "user": { "name": "ada" },
        "cart": { "items": 3 },
    }))
    .unwrap();

    let name = connect(component("Name", |props: &Props| {
        props.value("name").and_then(Value::as_str).unwrap_or("").to_string()
    }))
    .with_selector(Selector::key("user"));
    let items = connect(component("Items", |props: &Props| {
        props.value("items").and_then(Value::as_u64).unwrap_or(0)
    }))
    .with_selector(Selector::key("cart"));

    let header = parent("Header", move |cx, _props| {
        Ok(format!(
            "{} ({})",
            name.render(cx, Props::new())?,
            items.render(cx, Props::new())?
        ))
    });

    assert_eq!(provider.render(&header, Props::new()).unwrap(), "ada (3)");

    let err = header
        .render(&patchbay::Context::empty(), Props::new())
        .unwrap_err();
    assert!(matches!(err, Error::MissingProvider { .. }));
}

#[test]
fn parent_passes_data_and_actions_to_a_connected_child() {
    let provider = Provider::new(json!({
        "session": { "user": "ada", "title": "session" },
        "cart": { "items": 2, "title": "cart" },
    }))
    .unwrap();
    let add = Transmitter::sync(|_, mutate| {
        mutate.update(json!({ "cart": { "items": 3, "title": "cart" } })).unwrap();
    });
    let clear = Transmitter::sync(|_, mutate| {
        mutate.update(json!({ "cart": { "items": 0, "title": "cart" } })).unwrap();
    });

    let badge = connect(component("Badge", |props: &Props| props.clone()))
        .with_selector(Selector::key("cart"))
        .with_transmitters(Transmitters::new().with("add", add));
    let toolbar = connect(parent("Toolbar", move |cx, props: &Props| {
        badge.render(cx, props.clone().with("label", json!("Cart")))
    }))
    .with_selector(Selector::key("session"))
    .with_transmitters(Transmitters::new().with("clear", clear));

    let props = provider.render(&toolbar, Props::new()).unwrap();

    // the child's own selection and actions
    assert_eq!(props.value("items"), Some(&json!(2)));
    assert!(props.action("add").is_some());
    // everything the parent resolved sits on top
    assert_eq!(props.value("user"), Some(&json!("ada")));
    assert_eq!(props.value("label"), Some(&json!("Cart")));
    assert_eq!(props.value("title"), Some(&json!("session")));
    assert!(props.mutate().unwrap().targets(provider.store()));

    let _ = props.call("add", vec![]);
    assert_eq!(provider.store().snapshot()["cart"]["items"], json!(3));
    let _ = props.call("clear", vec![]);
    assert_eq!(provider.store().snapshot()["cart"]["items"], json!(0));
}

#[tokio::test]
async fn liveness_guards_stale_transmitters() {
    let provider = Provider::new(json!({ "status": "idle" })).unwrap();
    let view = connect(component("Loader", |props: &Props| props.clone()));
    let mounted = view.mount(&provider.context(), StateMap::new()).unwrap();
    let liveness = mounted.liveness();
    let mutate = mounted.output().mutate().cloned().unwrap();

    let late = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if liveness.is_alive() {
            mutate.update(json!({ "status": "loaded" })).unwrap();
        }
    });

    mounted.unmount();
    late.await.unwrap();

    assert_eq!(provider.store().snapshot()["status"], json!("idle"));
}
