//! Benchmarks for line tessellation: one builder per strategy over growing paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use linework::{DeviceCaps, DrawQueue, LineShape, LineViewParams, SimpleAtlas, Spline};
use linework_test_scenes::{build_scenes, SceneEnvironment};

/// A zigzag of `points` points in which every other point repeats the one before it.
fn zigzag(points: usize) -> Spline {
    (0..points)
        .map(|i| {
            let x = (i / 2) as f64;
            let y = if i % 4 < 2 { 0.0 } else { 1.0 };
            (x, y)
        })
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessellate");
    let atlas = SimpleAtlas::new();
    let caps = DeviceCaps::default();

    let strategies = [
        ("simple", LineViewParams::default().with_width(1.0)),
        ("solid", LineViewParams::default().with_width(6.0)),
        (
            "dashed",
            LineViewParams::default()
                .with_width(6.0)
                .with_pattern([6.0, 3.0])
                .with_base_gtop_scale(4.0),
        ),
    ];

    for size in [16, 256, 4096] {
        let spline = zigzag(size).into_shared();
        group.throughput(Throughput::Elements(size as u64));

        for (name, params) in &strategies {
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    let shape = LineShape::new(spline.clone(), params.clone()).unwrap();
                    let mut queue = DrawQueue::new();
                    shape.draw(&mut queue, &atlas, &caps).unwrap();
                    black_box(queue.len())
                });
            });
        }
    }

    group.finish();
}

fn bench_canonical_scenes(c: &mut Criterion) {
    let environment = SceneEnvironment::default();
    c.bench_function("canonical_scenes", |b| {
        b.iter(|| {
            let mut queue = DrawQueue::new();
            for scene in build_scenes() {
                scene
                    .shape
                    .draw(&mut queue, &environment.atlas, &environment.caps)
                    .unwrap();
            }
            black_box(queue.len())
        });
    });
}

criterion_group!(benches, bench_strategies, bench_canonical_scenes);
criterion_main!(benches);
