//! # Drifting Plexus
//!
//! Headless walk-through of a host integration: a cloud of particles drifts
//! around a box, and every frame the plexus lines and mesh are computed and
//! pushed into stand-in host resources.
//!
//! ## What This Demonstrates
//!
//! - Reusing a `ParticleSnapshot` with a varying live count
//! - `Plexus::compute_frame` + `Plexus::present`
//! - A `LinePool` of host line handles that grows once and is then reused
//! - Loading a config from JSON (pass a path as the first argument)
//!
//! Run with: `RUST_LOG=plexus=trace cargo run --example drift [config.json]`

use plexus::prelude::*;
use rand::Rng;

/// Stand-in for an engine line renderer.
#[derive(Default)]
struct HostLine {
    visible: bool,
    length: f32,
}

impl LineHandle for HostLine {
    fn set_active(&mut self, active: bool) {
        self.visible = active;
    }

    fn apply(&mut self, segment: &LineSegment) {
        self.length = segment.start.distance(segment.end);
    }
}

/// Stand-in for an engine mesh.
#[derive(Default)]
struct HostMesh {
    vertices: Vec<plexus::MeshVertex>,
}

impl MeshSink for HostMesh {
    fn submit(&mut self, mesh: &MeshBuffer) {
        mesh.interleave(&mut self.vertices);
    }

    fn clear(&mut self) {
        self.vertices.clear();
    }
}

fn main() -> plexus::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => PlexusConfig::load(path)?,
        None => PlexusConfig::web(),
    };

    let max_particles = 600;
    let mut rng = rand::thread_rng();
    let mut velocities: Vec<Vec3> = (0..max_particles)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-0.2..0.2),
                rng.gen_range(-0.2..0.2),
                rng.gen_range(-0.2..0.2),
            )
        })
        .collect();

    let mut snapshot = ParticleSnapshot::with_capacity(max_particles);
    for slot in snapshot.slots_mut() {
        *slot = Particle::at(Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ))
        .with_size(rng.gen_range(0.001..0.004))
        .with_color(Vec4::new(rng.gen(), rng.gen(), 1.0, 1.0));
    }

    let mut plexus = Plexus::new();
    let mut pool: LinePool<HostLine> = LinePool::new();
    let mut mesh = HostMesh::default();
    let dt = 1.0 / 60.0;

    for frame in 0..240 {
        // Particle count breathes between half and full capacity.
        let phase = (frame as f32 / 240.0 * std::f32::consts::TAU).sin() * 0.5 + 0.5;
        let live = max_particles / 2 + (phase * (max_particles / 2) as f32) as usize;
        snapshot.set_live_count(live);

        for (particle, velocity) in snapshot.slots_mut().iter_mut().zip(velocities.iter_mut()) {
            particle.position += *velocity * dt;
            for axis in 0..3 {
                if particle.position[axis].abs() > 1.0 {
                    velocity[axis] = -velocity[axis];
                }
            }
        }

        let stats = plexus
            .compute_frame(&FrameInput::local(&snapshot), &config)
            .stats;
        plexus.present(&mut pool, HostLine::default, &mut mesh);

        if frame % 60 == 0 {
            let visible = pool.handles().iter().filter(|l| l.visible).count();
            let longest = pool
                .handles()
                .iter()
                .filter(|l| l.visible)
                .map(|l| l.length)
                .fold(0.0f32, f32::max);
            println!(
                "frame {:>3}: {:>3} particles, {:>4} lines ({} pooled, {} visible, longest {:.3}), {:>4} triangles, {} mesh vertices",
                stats.frame,
                stats.particles,
                stats.lines,
                pool.len(),
                visible,
                longest,
                stats.triangles,
                mesh.vertices.len()
            );
        }
    }

    Ok(())
}
