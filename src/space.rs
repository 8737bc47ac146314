//! Simulation space to object space conversion.
//!
//! Particles live in one of three frames. Mesh vertices are always emitted in
//! the owning object's local frame, so once per frame the effect resolves a
//! single matrix and applies it to every vertex.

use glam::{Mat4, Vec3};

/// Frame in which the host simulates particle positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SimulationSpace {
    /// Positions are already in the owning object's local frame.
    #[default]
    Local,
    /// Positions are in world space.
    World,
    /// Positions are relative to another object, given by that object's
    /// current local-to-world matrix.
    Custom(Mat4),
}

impl SimulationSpace {
    /// Whether line endpoints should be interpreted in world space.
    #[inline]
    pub fn uses_world_space(&self) -> bool {
        matches!(self, SimulationSpace::World)
    }
}

/// Cached simulation-to-local transform for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpaceTransform {
    /// `None` means identity and skips the multiply entirely.
    matrix: Option<Mat4>,
}

impl SpaceTransform {
    pub const IDENTITY: Self = Self { matrix: None };

    /// Resolve the frame's transform from the simulation space and the owning
    /// object's local-to-world matrix.
    ///
    /// A non-invertible owner matrix cannot map world positions back into
    /// local space; the transform then falls back to identity.
    pub fn resolve(space: &SimulationSpace, owner_local_to_world: Mat4) -> Self {
        let world_to_local = match space {
            SimulationSpace::Local => return Self::IDENTITY,
            SimulationSpace::World | SimulationSpace::Custom(_) => {
                // The determinant scales with the cube of the owner's scale, so
                // only an exact zero or a non-finite inverse counts as singular.
                let det = owner_local_to_world.determinant();
                let inverse = (det != 0.0 && det.is_finite())
                    .then(|| owner_local_to_world.inverse())
                    .filter(Mat4::is_finite);
                match inverse {
                    Some(inverse) => inverse,
                    None => {
                        log::warn!(
                            "Owner transform is not invertible (det = {}), emitting mesh in simulation space",
                            det
                        );
                        return Self::IDENTITY;
                    }
                }
            }
        };

        match space {
            SimulationSpace::Custom(custom_local_to_world) => Self {
                matrix: Some(world_to_local * *custom_local_to_world),
            },
            _ => Self {
                matrix: Some(world_to_local),
            },
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.matrix.is_none()
    }

    /// The cached matrix, identity included.
    pub fn matrix(&self) -> Mat4 {
        self.matrix.unwrap_or(Mat4::IDENTITY)
    }

    /// Map a simulation-space point into the owner's local space.
    #[inline]
    pub fn apply(&self, point: Vec3) -> Vec3 {
        match &self.matrix {
            None => point,
            Some(m) => m.transform_point3(point),
        }
    }
}
