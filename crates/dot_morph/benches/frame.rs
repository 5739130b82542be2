mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dot_morph::prelude::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

const POOL_SIZES: [usize; 3] = [500, 2_000, 8_000];

fn grid_state(count: usize) -> ImageState {
    let side = (count as f32).sqrt().ceil() as usize;
    let points = (0..count)
        .map(|i| Vec2::new((i % side) as f32 * 6.0, (i / side) as f32 * 6.0))
        .collect();
    ImageState::new("grid", DotState::new(points), PixelRect::new(0, 0, 600, 600))
}

fn frame_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for &count in &POOL_SIZES {
        let mut rng = StdRng::seed_from_u64(common::SEED ^ count as u64);
        let mut system = ParticleSystem::new(
            MorphConfig::default(),
            (1024, 768),
            vec![grid_state(count)],
            &mut rng,
        )
        .expect("valid system");
        system.change_image();
        group.throughput(common::elements_throughput(count));

        group.bench_with_input(BenchmarkId::new("update", count), &count, |b, _| {
            let mut t = 0.0;
            b.iter(|| {
                t += 16.0;
                system.update(t, Some(Vec2::new(512.0, 384.0)));
                black_box(system.particles().len());
            });
        });

        let mut canvas = PixelCanvas::new(1024, 768);
        group.bench_with_input(BenchmarkId::new("draw", count), &count, |b, _| {
            b.iter(|| {
                canvas.clear_all();
                system.draw(&mut canvas);
                black_box(canvas.as_rgba().len());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = frame_benches
}
criterion_main!(benches);
