mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use loose_loot::prelude::WeightedSampler;

fn make_sampler(count: usize) -> WeightedSampler<String> {
    let mut sampler = WeightedSampler::with_capacity(count);
    for i in 0..count {
        let weight = 0.05 + ((i % 31) as f64) / 31.0;
        let _ = sampler.insert(format!("spawnpoint_{i}"), weight, ());
    }
    sampler
}

fn weighted_draw_without_replacement_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted/without_replacement");

    for &(n, k) in &[(64usize, 16usize), (512, 64), (2048, 128), (8192, 512)] {
        let sampler = make_sampler(n);
        group.throughput(common::elements_throughput(k));

        group.bench_with_input(BenchmarkId::new(format!("n{n}"), k), &k, |b, &k| {
            let mut rng = common::seeded_rng(0xC0FFEE);
            b.iter(|| {
                let keys = sampler.draw(k, false, &mut rng);
                black_box(keys);
            });
        });
    }

    group.finish();
}

fn weighted_draw_with_replacement_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted/with_replacement");

    for &n in &[8usize, 64, 512, 4096] {
        let sampler = make_sampler(n);
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = common::seeded_rng(0xDEADBEEF);
            b.iter(|| {
                let keys = sampler.draw(n, true, &mut rng);
                black_box(keys);
            });
        });
    }

    group.finish();
}

fn weighted_draw_one_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted/draw_one");

    for &n in &[8usize, 64, 512] {
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::new("with_build", n), &n, |b, &n| {
            b.iter_batched(
                || make_sampler(n),
                |sampler| {
                    let mut rng = common::seeded_rng(0x0);
                    black_box(sampler.draw_one(&mut rng));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = weighted_draw_without_replacement_benches,
              weighted_draw_with_replacement_benches,
              weighted_draw_one_benches
}
criterion_main!(benches);
