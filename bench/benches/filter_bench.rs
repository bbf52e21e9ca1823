//! Criterion harness: statistically sampled timings of each filtering
//! strategy at a few dataset sizes, complementing the one-shot runner.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rowbench::clock::ProcessClock;
use rowbench::populate::{generate_attr, seeded_rng};
use rowbench::suites::lookup;
use std::time::Duration;

fn bench_strategies(c: &mut Criterion) {
    let registry = lookup::registry().expect("lookup registry");
    let clock = ProcessClock::new();
    let mut group = c.benchmark_group("lookup");
    group.measurement_time(Duration::from_secs(5));

    for size in [200usize, 2_000, 20_000] {
        let data = generate_attr(size, &mut seeded_rng(72481));
        for op in registry.iter() {
            group.bench_with_input(BenchmarkId::new(op.name(), size), &data, |b, data| {
                b.iter(|| {
                    op.action()
                        .construct_and_filter(&clock, data)
                        .expect("filter failed")
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
