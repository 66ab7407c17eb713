//! Benchmarks for whole-swarm ticks.
//!
//! Run with: `cargo bench --bench tick`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use curl_swarm::{Extinction, NoiseType, Simulation};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.sample_size(20);

    for count in [1_000usize, 10_000, 50_000] {
        group.bench_with_input(
            BenchmarkId::new("approximate", count),
            &count,
            |b, &count| {
                let mut sim = Simulation::builder()
                    .with_particle_count(count)
                    .with_noise_seed(42.0)
                    .with_rng_seed(1)
                    .build()
                    .unwrap();
                b.iter(|| sim.tick())
            },
        );
    }

    group.bench_function("true_curl_10k", |b| {
        let mut sim = Simulation::builder()
            .with_particle_count(10_000)
            .with_noise_type(NoiseType::TrueCurl)
            .with_rng_seed(1)
            .build()
            .unwrap();
        b.iter(|| sim.tick())
    });

    group.bench_function("age_10k", |b| {
        let mut sim = Simulation::builder()
            .with_particle_count(10_000)
            .with_extinction(Extinction::Age)
            .with_life_span(20.0, 60.0)
            .with_rng_seed(1)
            .build()
            .unwrap();
        b.iter(|| sim.tick())
    });

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
