use std::time::Duration;

use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use instar::prelude::*;

struct Position {
    x: f32,
    #[allow(unused)]
    y: f32,
}

struct Velocity {
    #[allow(unused)]
    x: f32,
    #[allow(unused)]
    y: f32,
}

struct Rare;

fn benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    group
        .bench_function("entities_with", entities_with)
        .bench_function("intersection", intersection);
}

fn populated(count: usize) -> Store {
    let mut store = Store::new();

    for i in 0..count {
        let entity = store
            .spawn_with((
                Position { x: i as f32, y: 0.0 },
                Velocity { x: 1.0, y: -1.0 },
            ))
            .unwrap();

        if i % 100 == 0 {
            store.insert(entity, Rare);
        }
    }

    store
}

fn entities_with(bencher: &mut Bencher<'_>) {
    let store = populated(10_000);

    bencher.iter(|| store.entities_with::<Position>().unwrap())
}

fn intersection(bencher: &mut Bencher<'_>) {
    let store = populated(10_000);

    bencher.iter(|| {
        // seeded from the sparse `Rare` column
        let entities =
            store.entities_with_all::<(Position, Velocity, Rare)>().unwrap();
        let mut sum = 0.0;

        for entity in entities {
            sum += store.get::<Position>(entity).unwrap().x;
        }

        sum
    })
}

criterion_group!(
    name = this;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(4));
    targets = benchmark,
);
criterion_main!(this);
