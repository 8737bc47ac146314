//! Neighbor search and line selection.
//!
//! Every frame the graph is rebuilt with a full pairwise scan over the live
//! particles. Pairs are visited in strict `(i, j)` lexicographic order with
//! `i < j`, so the accepted line list is deterministic and each line keeps
//! binding to the same pooled renderer while the particle set is stable.
//!
//! Two caps bound the output:
//! - `max_lines_per_particle` limits lines where a particle is the lower
//!   index. Hitting it moves the scan on to the next particle.
//! - `max_lines_total` limits the whole frame. Hitting it ends the scan, so
//!   later particles are never visited at all.

use glam::Vec3;

use crate::buffer::RetainedBuffer;
use crate::particle::Particle;

/// An accepted connection between two particles, `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LinePair {
    pub a: usize,
    pub b: usize,
}

impl LinePair {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert!(a < b, "line pair must be ordered: ({}, {})", a, b);
        Self { a, b }
    }
}

impl From<(usize, usize)> for LinePair {
    fn from((a, b): (usize, usize)) -> Self {
        Self::new(a, b)
    }
}

/// Neighbors accepted for one particle, in discovery order.
///
/// Storage is kept across frames. Only the first `len()` entries are
/// meaningful.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyRecord {
    neighbors: RetainedBuffer<usize>,
}

impl AdjacencyRecord {
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Accepted neighbor indices, ascending.
    #[inline]
    pub fn neighbors(&self) -> &[usize] {
        self.neighbors.as_slice()
    }

    /// Linear scan over the accepted neighbors.
    ///
    /// Degree is capped by `max_lines_per_particle`, so this stays cheap.
    #[inline]
    pub fn has_neighbor(&self, index: usize) -> bool {
        self.neighbors.contains(&index)
    }

    fn reset(&mut self) {
        self.neighbors.clear();
    }

    fn push(&mut self, index: usize) {
        debug_assert!(!self.has_neighbor(index), "duplicate neighbor {}", index);
        self.neighbors.push(index);
    }
}

/// Parameters for one neighbor scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborParams {
    pub search_distance: f32,
    pub max_lines_total: usize,
    pub max_lines_per_particle: usize,
}

impl NeighborParams {
    /// Squared acceptance threshold. Negative or NaN distances accept nothing.
    #[inline]
    pub fn threshold_sq(&self) -> f32 {
        if self.search_distance > 0.0 {
            self.search_distance * self.search_distance
        } else {
            0.0
        }
    }
}

/// Line list and per-particle adjacency for one frame.
#[derive(Debug, Default)]
pub struct NeighborGraph {
    lines: Vec<LinePair>,
    adjacency: RetainedBuffer<AdjacencyRecord>,
    total_cap_hit: bool,
}

impl NeighborGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the graph from `particles`.
    ///
    /// Previous contents are discarded; allocations are kept.
    pub fn build(&mut self, particles: &[Particle], params: &NeighborParams) {
        let count = particles.len();
        self.lines.clear();
        self.adjacency.clear();
        if self.adjacency.reserve(count) {
            log::debug!("Growing adjacency storage to {} records", count);
        }

        let threshold_sq = params.threshold_sq();
        let per_particle_cap = params.max_lines_per_particle;

        for _ in 0..count {
            self.adjacency.next_slot().reset();
        }

        'scan: for i in 0..count {
            let first = particles[i].position;
            let mut accepted = 0usize;

            for j in (i + 1)..count {
                if self.lines.len() >= params.max_lines_total {
                    break 'scan;
                }
                if accepted >= per_particle_cap {
                    break;
                }

                if first.distance_squared(particles[j].position) < threshold_sq {
                    self.lines.push(LinePair::new(i, j));
                    self.record_mut(i).push(j);
                    accepted += 1;
                }
            }
        }

        // Also true when the last accepted candidate filled the cap exactly.
        self.total_cap_hit = self.lines.len() >= params.max_lines_total;
        if self.total_cap_hit {
            log::debug!("Line cap of {} reached", params.max_lines_total);
        }
    }

    /// Rebuild from bare positions, for hosts without size or color data.
    pub fn build_from_positions(&mut self, positions: &[Vec3], params: &NeighborParams) {
        let particles: Vec<Particle> = positions.iter().copied().map(Particle::at).collect();
        self.build(&particles, params);
    }

    /// Accepted lines in scan order.
    #[inline]
    pub fn lines(&self) -> &[LinePair] {
        &self.lines
    }

    /// Number of particles the graph was built for.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Adjacency record for particle `index`.
    #[inline]
    pub fn record(&self, index: usize) -> &AdjacencyRecord {
        &self.adjacency[index]
    }

    /// All adjacency records, indexed by particle.
    #[inline]
    pub fn records(&self) -> &[AdjacencyRecord] {
        self.adjacency.as_slice()
    }

    /// Whether `b` was accepted as a neighbor of `a` (with `a` as the lower index).
    #[inline]
    pub fn has_neighbor(&self, a: usize, b: usize) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|record| record.has_neighbor(b))
    }

    /// Whether the line count reached `max_lines_total` this frame.
    ///
    /// A cap of 0 always counts as reached.
    #[inline]
    pub fn total_cap_hit(&self) -> bool {
        self.total_cap_hit
    }

    /// Number of allocated adjacency records. Never decreases.
    pub fn adjacency_capacity(&self) -> usize {
        self.adjacency.capacity()
    }

    fn record_mut(&mut self, index: usize) -> &mut AdjacencyRecord {
        &mut self.adjacency.as_mut_slice()[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(distance: f32, total: usize, per_particle: usize) -> NeighborParams {
        NeighborParams {
            search_distance: distance,
            max_lines_total: total,
            max_lines_per_particle: per_particle,
        }
    }

    fn line_scenario() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 10.0),
        ]
    }

    #[test]
    fn test_chain_of_three_plus_outlier() {
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&line_scenario(), &params(1.5, 10, 10));

        assert_eq!(graph.lines(), &[LinePair::new(0, 1), LinePair::new(1, 2)]);
        assert_eq!(graph.record(0).neighbors(), &[1]);
        assert_eq!(graph.record(1).neighbors(), &[2]);
        assert!(graph.record(2).is_empty());
        assert!(graph.record(3).is_empty());
        assert!(!graph.total_cap_hit());
    }

    #[test]
    fn test_total_cap_stops_whole_scan() {
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&line_scenario(), &params(1.5, 1, 10));

        assert_eq!(graph.lines(), &[LinePair::new(0, 1)]);
        assert!(graph.record(1).is_empty());
        assert!(graph.total_cap_hit());
    }

    #[test]
    fn test_total_cap_filled_by_last_candidate() {
        // The only pair is the last candidate of the scan.
        let positions = vec![Vec3::ZERO, Vec3::X * 0.5];
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&positions, &params(1.0, 1, 10));

        assert_eq!(graph.lines(), &[LinePair::new(0, 1)]);
        assert!(graph.total_cap_hit());

        graph.build_from_positions(&positions, &params(1.0, 2, 10));
        assert!(!graph.total_cap_hit());
    }

    #[test]
    fn test_per_particle_cap_moves_to_next_row() {
        // Four particles all within range of each other.
        let positions = vec![Vec3::ZERO, Vec3::X * 0.1, Vec3::Y * 0.1, Vec3::Z * 0.1];
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&positions, &params(1.0, 100, 1));

        assert_eq!(
            graph.lines(),
            &[LinePair::new(0, 1), LinePair::new(1, 2), LinePair::new(2, 3)]
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let positions = vec![Vec3::ZERO, Vec3::X];
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&positions, &params(1.0, 10, 10));
        assert!(graph.lines().is_empty());
    }

    #[test]
    fn test_negative_distance_accepts_nothing() {
        let positions = vec![Vec3::ZERO, Vec3::X * 0.01];
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&positions, &params(-5.0, 10, 10));
        assert!(graph.lines().is_empty());

        graph.build_from_positions(&positions, &params(f32::NAN, 10, 10));
        assert!(graph.lines().is_empty());
    }

    #[test]
    fn test_zero_caps_and_empty_input() {
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&line_scenario(), &params(1.5, 0, 10));
        assert!(graph.lines().is_empty());

        graph.build_from_positions(&line_scenario(), &params(1.5, 10, 0));
        assert!(graph.lines().is_empty());

        graph.build_from_positions(&[], &params(1.5, 10, 10));
        assert!(graph.lines().is_empty());
        assert_eq!(graph.particle_count(), 0);
    }

    #[test]
    fn test_rebuild_discards_previous_frame() {
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&line_scenario(), &params(1.5, 10, 10));
        assert_eq!(graph.adjacency_capacity(), 4);

        let positions = vec![Vec3::ZERO, Vec3::splat(5.0)];
        graph.build_from_positions(&positions, &params(1.5, 10, 10));
        assert!(graph.lines().is_empty());
        assert_eq!(graph.particle_count(), 2);
        assert!(graph.record(0).is_empty());
        assert!(!graph.has_neighbor(0, 1));
        assert_eq!(graph.adjacency_capacity(), 4, "storage never shrinks");
    }

    #[test]
    fn test_has_neighbor_out_of_range() {
        let mut graph = NeighborGraph::new();
        graph.build_from_positions(&line_scenario(), &params(1.5, 10, 10));
        assert!(graph.has_neighbor(0, 1));
        assert!(!graph.has_neighbor(1, 0));
        assert!(!graph.has_neighbor(99, 1));
    }
}
