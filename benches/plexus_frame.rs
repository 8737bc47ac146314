//! Benchmarks for the per-frame neighbor scan and triangulation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plexus::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn cloud(count: usize) -> ParticleSnapshot {
    let mut rng = StdRng::seed_from_u64(1);
    let positions: Vec<Vec3> = (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
        })
        .collect();
    ParticleSnapshot::from_positions(&positions)
}

fn bench_lines_only(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let mut group = c.benchmark_group("lines_only");
    let mut config = PlexusConfig::new();
    config.search_distance(0.2).max_lines(10_000, 6);

    for count in [100usize, 500, 1000, 2000] {
        let snapshot = cloud(count);
        let mut plexus = Plexus::new();
        group.bench_with_input(BenchmarkId::from_parameter(count), &snapshot, |b, snapshot| {
            b.iter(|| {
                let output = plexus.compute_frame(&FrameInput::local(snapshot), &config);
                black_box(output.lines.len())
            })
        });
    }

    group.finish();
}

fn bench_with_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("with_mesh");

    for (name, mode) in [
        ("neighborhood", MeshMode::Neighborhood),
        ("strided", MeshMode::Strided { stride: 2 }),
    ] {
        let mut config = PlexusConfig::web();
        config.mesh(mode, 5_000);
        let snapshot = cloud(1000);
        let mut plexus = Plexus::new();
        group.bench_function(name, |b| {
            b.iter(|| {
                let output = plexus.compute_frame(&FrameInput::local(&snapshot), &config);
                black_box(output.stats.triangles)
            })
        });
    }

    group.finish();
}

fn bench_world_space(c: &mut Criterion) {
    let owner = Mat4::from_rotation_y(0.7) * Mat4::from_translation(Vec3::new(2.0, 0.0, -1.0));
    let snapshot = cloud(1000);
    let config = PlexusConfig::web();
    let mut plexus = Plexus::new();

    c.bench_function("world_space_mesh", |b| {
        b.iter(|| {
            let output = plexus.compute_frame(&FrameInput::world(&snapshot, owner), &config);
            black_box(output.stats.triangles)
        })
    });
}

criterion_group!(benches, bench_lines_only, bench_with_mesh, bench_world_space);
criterion_main!(benches);
