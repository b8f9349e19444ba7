//! Benchmarks for fast marching.
//!
//! Run with: cargo bench -p mesh-geodesic
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-geodesic -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-geodesic -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_geodesic::{FastMarchingParams, GeodesicMesh, InterpolationKind};
use mesh_types::{icosphere, planar_grid};

// =============================================================================
// Marching Benchmarks
// =============================================================================

fn bench_marching(c: &mut Criterion) {
    let mut group = c.benchmark_group("FastMarching");

    let test_cases = [
        ("sphere_1280tri", icosphere(3)),
        ("sphere_5120tri", icosphere(4)),
        ("grid_5000tri", planar_grid(50, 50, 1.0)),
    ];

    for (name, mesh) in &test_cases {
        let Ok(geo) = GeodesicMesh::new(mesh) else {
            continue;
        };
        group.throughput(Throughput::Elements(mesh.vertices.len() as u64));

        group.bench_with_input(BenchmarkId::new("single_source", name), &geo, |b, geo| {
            let params = FastMarchingParams::default();
            b.iter_batched(
                || geo.clone(),
                |mut geo| geo.march(black_box(&[0]), black_box(&params)),
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("eight_sources", name), &geo, |b, geo| {
            let params = FastMarchingParams::default();
            let step = (mesh.vertices.len() / 8) as u32;
            let sources: Vec<u32> = (0..8).map(|i| i * step).collect();
            b.iter_batched(
                || geo.clone(),
                |mut geo| geo.march(black_box(&sources), black_box(&params)),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Interpolation Benchmarks
// =============================================================================

fn bench_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Interpolation");

    let Ok(mut geo) = GeodesicMesh::new(&icosphere(3)) else {
        return;
    };
    if geo.march(&[0], &FastMarchingParams::default()).is_err() {
        return;
    }
    let faces = geo.face_count() as u32;

    for kind in [
        InterpolationKind::Linear,
        InterpolationKind::Quadratic,
        InterpolationKind::Cubic,
    ] {
        group.bench_function(BenchmarkId::new("build_all_faces", format!("{kind:?}")), |b| {
            b.iter(|| {
                for face in 0..faces {
                    let _ = black_box(geo.build_interpolation(face, kind));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_marching, bench_interpolation);
criterion_main!(benches);
