//! Criterion micro-benchmarks for stencil generation and neighbor reads.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use stencils_array::{Halo, Padding};
use stencils_bench::{wide_profile, SIDE};
use stencils_geometry::{Geometry, Shape};

/// Benchmark: generate a 3D circle of radius 6 without the cache.
fn bench_generate_circle_3d(c: &mut Criterion) {
    let shape = Shape::Circle { radius: 6, ndims: 3 };

    c.bench_function("generate_circle_3d_r6", |b| {
        b.iter(|| {
            let offsets = black_box(&shape).generate().unwrap();
            black_box(offsets);
        });
    });
}

/// Benchmark: cached constructor lookup for the same shape.
fn bench_cached_moore(c: &mut Criterion) {
    Geometry::moore(2, 3).unwrap();

    c.bench_function("cached_moore_3d_r2", |b| {
        b.iter(|| {
            let g = Geometry::moore(black_box(2), black_box(3)).unwrap();
            black_box(g);
        });
    });
}

/// Benchmark: gather every neighborhood of a 256x256 grid, once per padding.
fn bench_gather_all(c: &mut Criterion) {
    for (label, padding) in [
        ("conditional", Padding::Conditional),
        ("halo", Halo::outer().into()),
    ] {
        let arr = wide_profile(padding);
        c.bench_function(&format!("gather_circle_r3_{label}"), |b| {
            b.iter(|| {
                for r in 0..SIDE {
                    for col in 0..SIDE {
                        let hood = arr.neighbors(&[r, col]);
                        black_box(&hood);
                    }
                }
            });
        });
    }
}

criterion_group!(benches, bench_generate_circle_3d, bench_cached_moore, bench_gather_all);
criterion_main!(benches);
