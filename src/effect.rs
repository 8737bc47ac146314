//! Per-frame orchestration.
//!
//! [`Plexus`] owns every buffer that survives between frames. The host calls
//! [`Plexus::compute_frame`] once per frame and then either reads the returned
//! [`FrameOutput`] directly or calls [`Plexus::present`] to push it into its
//! line pool and mesh.
//!
//! ```ignore
//! let mut plexus = Plexus::new();
//! let config = PlexusConfig::web();
//!
//! // Every frame:
//! let input = FrameInput::local(&snapshot);
//! plexus.compute_frame(&input, &config);
//! plexus.present(&mut pool, || host.spawn_line(), &mut host_mesh);
//! ```

use glam::Mat4;

use crate::config::PlexusConfig;
use crate::lines::{LineHandle, LinePool, LineSegment, LineStyle};
use crate::mesh::{MeshBuffer, MeshSink};
use crate::neighbors::{LinePair, NeighborGraph, NeighborParams};
use crate::particle::ParticleSnapshot;
use crate::space::{SimulationSpace, SpaceTransform};
use crate::triangulate::{MeshTriangulator, TriangulateParams};

/// Everything the host provides for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub snapshot: &'a ParticleSnapshot,
    pub space: SimulationSpace,
    /// The owning object's current local-to-world matrix.
    pub owner_local_to_world: Mat4,
}

impl<'a> FrameInput<'a> {
    /// Input for particles simulated in the owner's local space.
    pub fn local(snapshot: &'a ParticleSnapshot) -> Self {
        Self {
            snapshot,
            space: SimulationSpace::Local,
            owner_local_to_world: Mat4::IDENTITY,
        }
    }

    /// Input for particles simulated in world space.
    pub fn world(snapshot: &'a ParticleSnapshot, owner_local_to_world: Mat4) -> Self {
        Self {
            snapshot,
            space: SimulationSpace::World,
            owner_local_to_world,
        }
    }

    /// Input for particles simulated relative to another object.
    pub fn custom(
        snapshot: &'a ParticleSnapshot,
        owner_local_to_world: Mat4,
        custom_local_to_world: Mat4,
    ) -> Self {
        Self {
            snapshot,
            space: SimulationSpace::Custom(custom_local_to_world),
            owner_local_to_world,
        }
    }
}

/// Counters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    pub particles: usize,
    pub lines: usize,
    pub triangles: usize,
    /// The line count reached `max_lines_total`.
    pub line_cap_hit: bool,
    /// The triangle count reached `max_triangles`.
    pub triangle_cap_hit: bool,
}

/// Borrowed view of a finished frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    /// Accepted pairs in scan order.
    pub lines: &'a [LinePair],
    /// Render attributes, one per line, same order.
    pub segments: &'a [LineSegment],
    /// Triangulated mesh, `None` when mesh output is disabled.
    pub mesh: Option<&'a MeshBuffer>,
    pub stats: FrameStats,
}

/// The plexus effect and its retained per-frame storage.
#[derive(Debug, Default)]
pub struct Plexus {
    graph: NeighborGraph,
    triangulator: MeshTriangulator,
    segments: Vec<LineSegment>,
    use_mesh: bool,
    stats: FrameStats,
}

impl Plexus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute lines and, if enabled, the mesh for one frame.
    ///
    /// The configuration is sanitized first; this never fails on bad numbers.
    pub fn compute_frame(&mut self, input: &FrameInput<'_>, config: &PlexusConfig) -> FrameOutput<'_> {
        let config = config.sanitized();
        let particles = input.snapshot.particles();

        self.graph.build(
            particles,
            &NeighborParams {
                search_distance: config.search_distance,
                max_lines_total: config.max_lines_total,
                max_lines_per_particle: config.max_lines_per_particle,
            },
        );

        let style = LineStyle {
            template: config.line_template,
            size_blend: config.size_blend,
            color_blend: config.color_blend,
            use_world_space: input.space.uses_world_space(),
        };
        style.build_segments(particles, self.graph.lines(), &mut self.segments);

        self.use_mesh = config.use_mesh;
        if config.use_mesh {
            let transform = SpaceTransform::resolve(&input.space, input.owner_local_to_world);
            self.triangulator.triangulate(
                particles,
                &self.graph,
                &transform,
                &TriangulateParams {
                    mode: config.mesh_mode,
                    max_triangles: config.max_triangles,
                    color_blend: config.mesh_color_blend,
                    search_distance: config.search_distance,
                },
            );
        } else {
            self.triangulator.clear();
        }

        self.stats = FrameStats {
            frame: self.stats.frame + 1,
            particles: particles.len(),
            lines: self.graph.lines().len(),
            triangles: self.triangulator.mesh().triangle_count(),
            line_cap_hit: self.graph.total_cap_hit(),
            triangle_cap_hit: self.triangulator.cap_hit(),
        };

        log::trace!(
            "Frame {}: {} particles, {} lines, {} triangles",
            self.stats.frame,
            self.stats.particles,
            self.stats.lines,
            self.stats.triangles
        );

        self.output()
    }

    /// View of the most recently computed frame.
    pub fn output(&self) -> FrameOutput<'_> {
        FrameOutput {
            lines: self.graph.lines(),
            segments: &self.segments,
            mesh: self.use_mesh.then(|| self.triangulator.mesh()),
            stats: self.stats,
        }
    }

    /// Push the last frame into host resources.
    ///
    /// Lines bind to pool handles by scan index; surplus handles are
    /// deactivated. The mesh is replaced wholesale, or cleared when mesh
    /// output is disabled.
    pub fn present<H, M>(&self, pool: &mut LinePool<H>, make_line: impl FnMut() -> H, mesh: &mut M)
    where
        H: LineHandle,
        M: MeshSink,
    {
        pool.sync(&self.segments, make_line);
        if self.use_mesh {
            mesh.submit(self.triangulator.mesh());
        } else {
            mesh.clear();
        }
    }

    /// The neighbor graph from the last frame.
    #[inline]
    pub fn graph(&self) -> &NeighborGraph {
        &self.graph
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeshMode;
    use crate::particle::Particle;
    use glam::{Vec3, Vec4};

    #[derive(Default)]
    struct RecordingMesh {
        submitted: Option<usize>,
        cleared: bool,
    }

    impl MeshSink for RecordingMesh {
        fn submit(&mut self, mesh: &MeshBuffer) {
            self.submitted = Some(mesh.triangle_count());
            self.cleared = false;
        }

        fn clear(&mut self) {
            self.submitted = None;
            self.cleared = true;
        }
    }

    #[derive(Default)]
    struct Line {
        active: bool,
        start: Vec3,
    }

    impl LineHandle for Line {
        fn set_active(&mut self, active: bool) {
            self.active = active;
        }

        fn apply(&mut self, segment: &LineSegment) {
            self.start = segment.start;
        }
    }

    fn triangle_snapshot() -> ParticleSnapshot {
        ParticleSnapshot::from_positions(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
        ])
    }

    #[test]
    fn test_mesh_disabled_skips_triangulation() {
        let snapshot = triangle_snapshot();
        let mut config = PlexusConfig::new();
        config.search_distance(1.0).no_mesh();

        let mut plexus = Plexus::new();
        let output = plexus.compute_frame(&FrameInput::local(&snapshot), &config);
        assert_eq!(output.lines.len(), 3);
        assert!(output.mesh.is_none());
        assert_eq!(output.stats.triangles, 0);
    }

    #[test]
    fn test_mesh_enabled() {
        let snapshot = triangle_snapshot();
        let mut config = PlexusConfig::new();
        config.search_distance(1.0).mesh(MeshMode::Neighborhood, 1);

        let mut plexus = Plexus::new();
        let output = plexus.compute_frame(&FrameInput::local(&snapshot), &config);
        let mesh = output.mesh.unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.positions(), &[snapshot.position(0), snapshot.position(1), snapshot.position(2)]);
        assert_eq!(output.stats.frame, 1);
    }

    #[test]
    fn test_present_syncs_pool_and_mesh() {
        let snapshot = triangle_snapshot();
        let mut config = PlexusConfig::new();
        config.search_distance(1.0).mesh(MeshMode::Neighborhood, 10);

        let mut plexus = Plexus::new();
        let mut pool = LinePool::new();
        let mut mesh = RecordingMesh::default();

        plexus.compute_frame(&FrameInput::local(&snapshot), &config);
        plexus.present(&mut pool, Line::default, &mut mesh);
        assert_eq!(pool.active_count(), 3);
        assert_eq!(mesh.submitted, Some(1));

        config.no_mesh().search_distance(0.6);
        plexus.compute_frame(&FrameInput::local(&snapshot), &config);
        plexus.present(&mut pool, Line::default, &mut mesh);
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.len(), 3);
        assert!(!pool.handles()[2].active);
        assert!(mesh.cleared);
    }

    #[test]
    fn test_world_space_flag_and_line_endpoints_untransformed() {
        let snapshot = triangle_snapshot();
        let mut config = PlexusConfig::new();
        config.search_distance(1.0);
        let owner = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));

        let mut plexus = Plexus::new();
        let output = plexus.compute_frame(&FrameInput::world(&snapshot, owner), &config);
        assert!(output.segments.iter().all(|s| s.use_world_space));
        assert_eq!(output.segments[0].start, snapshot.position(0));
    }

    #[test]
    fn test_invalid_config_degrades() {
        let snapshot = triangle_snapshot();
        let mut config = PlexusConfig::new();
        config.search_distance(-1.0).color_blend(5.0);

        let mut plexus = Plexus::new();
        let output = plexus.compute_frame(&FrameInput::local(&snapshot), &config);
        assert!(output.lines.is_empty());
    }

    #[test]
    fn test_segment_colors_follow_blend() {
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let snapshot = ParticleSnapshot::from_particles(vec![
            Particle::at(Vec3::ZERO).with_color(red),
            Particle::at(Vec3::X * 0.1).with_color(red),
        ]);
        let mut config = PlexusConfig::new();
        config.search_distance(1.0).color_blend(1.0);

        let mut plexus = Plexus::new();
        let output = plexus.compute_frame(&FrameInput::local(&snapshot), &config);
        assert_eq!(output.segments[0].start_color, red);
        assert_eq!(output.segments[0].end_color, red);
    }

    #[test]
    fn test_frame_counter_advances() {
        let snapshot = triangle_snapshot();
        let config = PlexusConfig::new();
        let mut plexus = Plexus::new();
        plexus.compute_frame(&FrameInput::local(&snapshot), &config);
        plexus.compute_frame(&FrameInput::local(&snapshot), &config);
        assert_eq!(plexus.stats().frame, 2);
    }
}
