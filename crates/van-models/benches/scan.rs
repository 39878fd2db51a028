//! Benchmarks for the LSTM-2D scan in scoring and drawing mode.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use van_core::backend::CpuBackend;
use van_core::config::VanConfig;
use van_models::Lstm2d;
use van_samplers::RngKey;

fn build(size: usize, z2: bool) -> Lstm2d<CpuBackend> {
    let config = VanConfig::builder()
        .lattice_size(size)
        .net_width(32)
        .z2(z2)
        .build()
        .expect("valid config");
    Lstm2d::new(&config, &Default::default()).expect("build model")
}

fn benchmark_log_prob(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_prob");

    for size in [4usize, 8, 16].iter() {
        for z2 in [false, true] {
            let model = build(*size, z2);
            let (x, _) = model.sample(64, RngKey::new(0));
            let id = if z2 { "z2" } else { "plain" };

            group.bench_with_input(BenchmarkId::new(id, size), size, |b, _| {
                b.iter(|| model.log_prob(black_box(x.clone())));
            });
        }
    }

    group.finish();
}

fn benchmark_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");

    for size in [4usize, 8, 16].iter() {
        let model = build(*size, true);
        group.bench_with_input(BenchmarkId::new("batch64", size), size, |b, _| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                model.sample(black_box(64), RngKey::new(seed))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_log_prob, benchmark_sample);
criterion_main!(benches);
