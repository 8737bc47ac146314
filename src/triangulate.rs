//! Triangulation of the neighbor graph.
//!
//! Triangles are built from pairs of consecutive entries in each particle's
//! adjacency record rather than from every pair. That keeps the triangle count
//! linear in `particles × max_lines_per_particle` and approximates a fan over
//! each particle's local neighborhood.

use glam::Vec4;

use crate::blend::{blend_color, WHITE};
use crate::config::MeshMode;
use crate::mesh::{MeshBuffer, TriangleRecord};
use crate::neighbors::{AdjacencyRecord, NeighborGraph};
use crate::particle::Particle;
use crate::space::SpaceTransform;

/// Parameters for one triangulation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangulateParams {
    pub mode: MeshMode,
    pub max_triangles: usize,
    /// Blend from white toward particle color. 0 omits vertex colors.
    pub color_blend: f32,
    /// Only used by [`MeshMode::Strided`].
    pub search_distance: f32,
}

/// Builds a [`MeshBuffer`] from a [`NeighborGraph`].
#[derive(Debug, Default)]
pub struct MeshTriangulator {
    mesh: MeshBuffer,
    cap_hit: bool,
}

impl MeshTriangulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the mesh for this frame.
    pub fn triangulate(
        &mut self,
        particles: &[Particle],
        graph: &NeighborGraph,
        transform: &SpaceTransform,
        params: &TriangulateParams,
    ) -> &MeshBuffer {
        self.mesh.clear();

        let mut emitter = Emitter {
            particles,
            transform,
            color_blend: params.color_blend,
            max_triangles: params.max_triangles,
            mesh: &mut self.mesh,
        };

        match params.mode {
            MeshMode::Neighborhood => neighborhood(graph.records(), &mut emitter),
            MeshMode::Strided { stride } => {
                let threshold_sq = if params.search_distance > 0.0 {
                    params.search_distance * params.search_distance
                } else {
                    0.0
                };
                strided(graph.records(), stride.max(1), threshold_sq, &mut emitter)
            }
        }

        // Also true when the last candidate filled the cap exactly.
        self.cap_hit = self.mesh.triangle_count() >= params.max_triangles;
        if self.cap_hit {
            log::debug!("Triangle cap of {} reached", params.max_triangles);
        }

        &self.mesh
    }

    /// Mesh from the last [`triangulate`](Self::triangulate) call.
    #[inline]
    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    /// Whether the last pass reached `max_triangles`. A cap of 0 always counts
    /// as reached.
    #[inline]
    pub fn cap_hit(&self) -> bool {
        self.cap_hit
    }

    /// Drop all triangles, keeping allocations.
    pub fn clear(&mut self) {
        self.mesh.clear();
        self.cap_hit = false;
    }
}

struct Emitter<'a> {
    particles: &'a [Particle],
    transform: &'a SpaceTransform,
    color_blend: f32,
    max_triangles: usize,
    mesh: &'a mut MeshBuffer,
}

impl Emitter<'_> {
    #[inline]
    fn full(&self) -> bool {
        self.mesh.triangle_count() >= self.max_triangles
    }

    fn emit(&mut self, a: usize, b: usize, c: usize) {
        let (pa, pb, pc) = (&self.particles[a], &self.particles[b], &self.particles[c]);
        let colors = (self.color_blend > 0.0).then(|| {
            [pa.color, pb.color, pc.color].map(|color: Vec4| blend_color(WHITE, color, self.color_blend))
        });

        self.mesh.push(TriangleRecord {
            particles: [a, b, c],
            positions: [
                self.transform.apply(pa.position),
                self.transform.apply(pb.position),
                self.transform.apply(pc.position),
            ],
            colors,
        });
    }
}

/// Emit `(i, B, C)` for consecutive neighbors B, C that are themselves
/// connected in either direction.
fn neighborhood(records: &[AdjacencyRecord], emitter: &mut Emitter<'_>) {
    for (i, record) in records.iter().enumerate() {
        for pair in record.neighbors().windows(2) {
            if emitter.full() {
                return;
            }
            let (b, c) = (pair[0], pair[1]);
            if records[b].has_neighbor(c) || records[c].has_neighbor(b) {
                emitter.emit(i, b, c);
            }
        }
    }
}

/// Emit `(i, record[k], record[k - 1])` for every `stride`-th neighbor when
/// the two neighbors are within range.
fn strided(
    records: &[AdjacencyRecord],
    stride: usize,
    threshold_sq: f32,
    emitter: &mut Emitter<'_>,
) {
    for (i, record) in records.iter().enumerate() {
        let neighbors = record.neighbors();
        for k in 1..neighbors.len() {
            if (k + 1) % stride != 0 {
                continue;
            }
            if emitter.full() {
                return;
            }
            let (b, c) = (neighbors[k], neighbors[k - 1]);
            let pb = emitter.particles[b].position;
            let pc = emitter.particles[c].position;
            if pb.distance_squared(pc) < threshold_sq {
                emitter.emit(i, b, c);
            }
        }
    }
}
