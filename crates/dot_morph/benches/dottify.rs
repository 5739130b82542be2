mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dot_morph::sampler::DotSampler;

const SIZES: [u32; 3] = [256, 512, 1024];
const GAPS: [u32; 3] = [6, 12, 18];

fn dottify_benches(c: &mut Criterion) {
    for &gap in &GAPS {
        let mut group = c.benchmark_group(format!("dottify/gap_{gap}"));
        let sampler = DotSampler::new(gap);

        for &size in &SIZES {
            let rgba = common::disc_rgba(size);
            group.throughput(common::pixel_throughput(size, size));
            group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
                b.iter(|| {
                    let state = sampler.sample(&rgba, size, size).expect("valid buffer");
                    black_box(state.len());
                });
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = dottify_benches
}
criterion_main!(benches);
