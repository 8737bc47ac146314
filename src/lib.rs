//! # Plexus
//!
//! Lines and triangles between nearby particles, computed once per frame.
//!
//! The host owns the particle simulation and the renderer. Each frame it
//! fills a [`ParticleSnapshot`], and plexus works out which particles connect,
//! what those lines look like, and (optionally) a triangle mesh spanning the
//! connections.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plexus::prelude::*;
//!
//! let mut snapshot = ParticleSnapshot::with_capacity(1000);
//! let mut plexus = Plexus::new();
//! let mut config = PlexusConfig::new();
//! config
//!     .search_distance(0.2)
//!     .max_lines(500, 4)
//!     .mesh(MeshMode::Neighborhood, 300);
//!
//! // Every frame:
//! host.copy_particles(snapshot.slots_mut());
//! snapshot.set_live_count(host.particle_count());
//!
//! let output = plexus.compute_frame(&FrameInput::local(&snapshot), &config);
//! for segment in output.segments {
//!     host.draw_line(segment.start, segment.end);
//! }
//! ```
//!
//! ## How Lines Are Chosen
//!
//! Every pair `(i, j)` with `i < j` is tested in lexicographic order, and a
//! pair closer than `search_distance` becomes a line. Two caps apply:
//!
//! - `max_lines_per_particle` - once particle `i` has this many lines as the
//!   lower index, the scan moves on to `i + 1`
//! - `max_lines_total` - once the frame has this many lines, the scan stops
//!
//! The fixed order makes output deterministic, and line `n` always binds to
//! pooled line handle `n` (see [`LinePool`]).
//!
//! ## Meshes
//!
//! | Mode | Triangle `(i, B, C)` accepted when |
//! |------|------------------------------------|
//! | [`MeshMode::Neighborhood`] | B, C consecutive neighbors of `i` and connected to each other |
//! | [`MeshMode::Strided`] | every `stride`-th neighbor pair of `i` within `search_distance` |
//!
//! Vertices are emitted in the owning object's local space (see
//! [`SimulationSpace`]).

pub mod blend;
pub mod buffer;
pub mod config;
mod effect;
pub mod error;
pub mod lines;
pub mod mesh;
pub mod neighbors;
pub mod particle;
pub mod space;
pub mod triangulate;

pub use bytemuck;
pub use buffer::RetainedBuffer;
pub use config::{ConfigDiff, LineTemplate, MeshMode, PlexusConfig};
pub use effect::{FrameInput, FrameOutput, FrameStats, Plexus};
pub use error::{PlexusError, Result};
pub use glam::{Mat4, Vec3, Vec4};
pub use lines::{LineHandle, LinePool, LineSegment, LineStyle};
pub use mesh::{MeshBuffer, MeshSink, MeshVertex, TriangleRecord};
pub use neighbors::{AdjacencyRecord, LinePair, NeighborGraph, NeighborParams};
pub use particle::{Particle, ParticleSnapshot};
pub use space::{SimulationSpace, SpaceTransform};
pub use triangulate::{MeshTriangulator, TriangulateParams};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use plexus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{LineTemplate, MeshMode, PlexusConfig};
    pub use crate::effect::{FrameInput, FrameOutput, FrameStats, Plexus};
    pub use crate::lines::{LineHandle, LinePool, LineSegment};
    pub use crate::mesh::{MeshBuffer, MeshSink};
    pub use crate::particle::{Particle, ParticleSnapshot};
    pub use crate::space::SimulationSpace;
    pub use crate::{Mat4, Vec3, Vec4};
}
