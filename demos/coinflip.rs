//! Coin flipping with an asynchronous transmitter

use patchbay::{
    component, connect, Dispatch, Mutate, Props, Provider, StateMap, Transmitter, Transmitters,
};
use serde_json::{json, Value};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}

/// `coinflip(guess)`: announce the flip, wait, then report the outcome.
fn coinflip() -> Transmitter {
    Transmitter::new(|args| {
        let guess = args.first().and_then(Value::as_bool).unwrap_or(true);
        move |mutate: Mutate| {
            mutate
                .update(json!({ "result": "Flipping!!" }))
                .expect("a result object is a valid payload");
            Dispatch::pending(async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                let heads = rand::random::<bool>();
                let result = if heads == guess { "YOU WON!" } else { "YOU LOST!" };
                mutate
                    .update(json!({ "result": result, "heads": heads }))
                    .expect("a result object is a valid payload");
            })
        }
    })
}

#[tokio::main]
async fn main() -> patchbay::Result<()> {
    init_tracing();
    println!("=== Coinflip Example ===\n");

    let provider = Provider::new(json!({ "result": "Pick a side", "heads": null }))?;

    let board = connect(component("Board", |props: &Props| props.clone()))
        .with_transmitters(Transmitters::new().with("coinflip", coinflip()));
    let mounted = board.mount(&provider.context(), StateMap::new())?;

    // Print every state the board renders with
    let _sub = provider.store().subscribe(|snapshot| {
        println!("   [v{}] {}", snapshot.version(), snapshot["result"]);
    });

    for guess in [true, false, true] {
        println!("\nGuessing {}", if guess { "heads" } else { "tails" });
        if let Some(flip) = mounted.output().call("coinflip", vec![json!(guess)]) {
            flip.await;
        }
    }

    println!("\nRenders: {}", mounted.renders());
    println!("\n✓ Example complete!");
    Ok(())
}
