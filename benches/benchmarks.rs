use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::hint::black_box;

use patchbay::{
    component, connect, Props, Provider, Selector, StateMap, Store, Transmitter, Transmitters,
};

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| Store::new(black_box(json!({ "count": 0, "name": "test" }))).unwrap());
    });
}

fn snapshot_read_benchmark(c: &mut Criterion) {
    let store = Store::new(json!({ "count": 42 })).unwrap();

    c.bench_function("snapshot_read", |b| {
        b.iter(|| {
            black_box(store.snapshot());
        });
    });
}

fn store_update_benchmark(c: &mut Criterion) {
    let store = Store::new(json!({ "counter": 0, "name": "test" })).unwrap();

    c.bench_function("store_update", |b| {
        let mut i = 0;
        b.iter(|| {
            store.update(json!({ "counter": black_box(i) })).unwrap();
            i += 1;
        });
    });
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_subscribe");

    for subscriber_count in [1, 10, 100].iter() {
        let store = Store::new(json!({ "value": 0 })).unwrap();

        let _subscriptions = (0..*subscriber_count)
            .map(|_| {
                store.subscribe(|_| {
                    // Empty subscriber
                })
            })
            .collect::<Vec<_>>();

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.update(json!({ "value": black_box(i) })).unwrap();
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn connected_render_benchmark(c: &mut Criterion) {
    let provider = Provider::new(json!({
        "portion": { "a": 1, "b": 2, "c": 3 },
        "rest": { "d": 4 },
    }))
    .unwrap();

    let transmitters = (0..8)
        .map(|i| (format!("action{i}"), Transmitter::sync(|_, _| {})))
        .collect::<Transmitters>();
    let view = connect(component("Bench", |props: &Props| props.values().len()))
        .with_selector(Selector::key("portion"))
        .with_transmitters(transmitters);

    c.bench_function("connected_render", |b| {
        b.iter(|| black_box(provider.render(&view, Props::new()).unwrap()));
    });
}

fn mounted_rerender_benchmark(c: &mut Criterion) {
    let provider = Provider::new(json!({ "count": 0 })).unwrap();
    let _mounted = connect(component("Count", |props: &Props| props.value("count").cloned()))
        .mount(&provider.context(), StateMap::new())
        .unwrap();

    c.bench_function("mounted_rerender", |b| {
        let mut i = 0;
        b.iter(|| {
            provider.store().update(json!({ "count": black_box(i) })).unwrap();
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    store_creation_benchmark,
    snapshot_read_benchmark,
    store_update_benchmark,
    store_subscribe_benchmark,
    connected_render_benchmark,
    mounted_rerender_benchmark,
);
criterion_main!(benches);
