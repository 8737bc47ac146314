//! Triangle output and its hand-off to the host mesh.
//!
//! Triangles are stored twice: as [`TriangleRecord`]s that keep the particle
//! indices for inspection, and flattened into a [`MeshBuffer`] that can be
//! submitted as-is. Every triangle gets its own three vertices, so indices
//! are simply sequential.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// One emitted triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleRecord {
    /// Particle indices `(A, B, C)`.
    pub particles: [usize; 3],
    /// Vertex positions in the owner's local space.
    pub positions: [Vec3; 3],
    /// Vertex colors, present only when mesh color blending is on.
    pub colors: Option<[Vec4; 3]>,
}

/// Interleaved vertex layout for direct GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Flattened mesh arrays for one frame.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffer {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    colors: Vec<Vec4>,
    triangles: Vec<TriangleRecord>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all triangles, keeping allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
        self.colors.clear();
        self.triangles.clear();
    }

    /// Append a triangle with three fresh vertices.
    ///
    /// # Panics
    ///
    /// Panics if the new vertices cannot be addressed by `u32` indices.
    pub fn push(&mut self, triangle: TriangleRecord) {
        let base = vertex_base(self.positions.len());
        self.positions.extend_from_slice(&triangle.positions);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
        if let Some(colors) = triangle.colors {
            self.colors.extend_from_slice(&colors);
        }
        self.triangles.push(triangle);
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex positions, three per triangle.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle indices grouped in threes.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex colors. Empty when mesh color blending is off.
    #[inline]
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    #[inline]
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    #[inline]
    pub fn triangles(&self) -> &[TriangleRecord] {
        &self.triangles
    }

    /// Write interleaved vertices into `out`. Missing colors become white.
    pub fn interleave(&self, out: &mut Vec<MeshVertex>) {
        out.clear();
        out.extend(self.positions.iter().enumerate().map(|(i, position)| {
            let color = self.colors.get(i).copied().unwrap_or(Vec4::ONE);
            MeshVertex {
                position: position.to_array(),
                color: color.to_array(),
            }
        }));
    }

    /// Index data as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// First index for a triangle appended after `vertex_count` vertices.
fn vertex_base(vertex_count: usize) -> u32 {
    match u32::try_from(vertex_count) {
        Ok(base) if base <= u32::MAX - 2 => base,
        _ => panic!(
            "mesh vertex count {} exceeds the u32 index range",
            vertex_count
        ),
    }
}

/// A host-owned renderable mesh that receives a full replacement each frame.
///
/// Normals, if the host needs them, are recomputed on its side from the
/// submitted triangles.
pub trait MeshSink {
    /// Replace the mesh contents with `mesh`.
    fn submit(&mut self, mesh: &MeshBuffer);

    /// Remove all geometry.
    fn clear(&mut self);
}
