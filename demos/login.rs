//! A login screen wired to the store through `connect`

use patchbay::{
    component, connect, parent, Component, Props, Provider, Selector, StateMap, Transmitter,
    Transmitters,
};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() -> patchbay::Result<()> {
    init_tracing();
    println!("=== Login Example ===\n");

    println!("1. Creating provider");
    let store = Provider::builder()
        .label("login-demo")
        .initial_state(json!({
            "session": { "loggedIn": false, "user": null },
            "settings": { "theme": "dark" },
        }))
        .build()?;
    let provider = Provider::from_store(store);

    let login = Transmitter::sync(|args, mutate| {
        let user = args.first().cloned().unwrap_or(Value::Null);
        mutate
            .update(json!({ "session": { "loggedIn": true, "user": user } }))
            .expect("a session object is a valid payload");
    });
    let logout = Transmitter::sync(|_args, mutate| {
        mutate
            .update(json!({ "session": { "loggedIn": false, "user": null } }))
            .expect("a session object is a valid payload");
    });

    let status = connect(component("Status", |props: &Props| {
        match (props.value("loggedIn"), props.value("user")) {
            (Some(Value::Bool(true)), Some(Value::String(user))) => format!("signed in as {user}"),
            _ => "signed out".to_string(),
        }
    }))
    .with_selector(Selector::key("session"));

    let theme = connect(component("Theme", |props: &Props| {
        props
            .value("theme")
            .and_then(Value::as_str)
            .unwrap_or("light")
            .to_string()
    }))
    .with_selector(Selector::key("settings"));

    let app = parent("App", move |cx, _props| {
        Ok(format!(
            "[{}] {}",
            theme.render(cx, Props::new())?,
            status.render(cx, Props::new())?
        ))
    });

    println!("\n2. Initial render:");
    println!("   {}", provider.render(&app, Props::new())?);

    println!("\n3. Mounting a login button");
    let button = connect(component("LoginButton", |props: &Props| props.clone()))
        .with_selector(Selector::key("session"))
        .with_transmitters(
            Transmitters::new()
                .with("login", login)
                .with("logout", logout),
        );
    let mounted = button.mount(&provider.context(), StateMap::new())?;

    println!("\n4. Clicking login");
    if mounted.output().call("login", vec![json!("ada")]).is_none() {
        println!("   no login action bound");
    }
    println!("   {}", provider.render(&app, Props::new())?);
    println!("   button has rendered {} times", mounted.renders());

    println!("\n5. Clicking logout");
    if mounted.output().call("logout", vec![]).is_none() {
        println!("   no logout action bound");
    }
    println!("   {}", provider.render(&app, Props::new())?);

    println!("\n6. Final state:");
    println!("   {}", provider.store().snapshot().to_value());

    println!("\n✓ Example complete!");
    Ok(())
}
