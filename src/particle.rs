//! Per-frame particle snapshots supplied by the host.
//!
//! The host simulation owns the particles. Once per frame it copies position,
//! current size and current color into a [`ParticleSnapshot`] and declares how
//! many of the slots are live. Indices into the live range identify particles
//! for that frame only.

use glam::{Vec3, Vec4};

/// One particle as sampled by the host for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in simulation space.
    pub position: Vec3,
    /// Size sampled at the particle's current lifetime.
    pub size: f32,
    /// RGBA color sampled at the particle's current lifetime.
    pub color: Vec4,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            size: 1.0,
            color: Vec4::ONE,
        }
    }
}

impl Particle {
    /// Particle at `position` with unit size and white color.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }
}

/// Slot storage for one frame of particles.
///
/// Storage is sized to the host's maximum particle count and only ever grows.
/// Slots past the live count keep whatever the host wrote in earlier frames
/// and are never read.
#[derive(Debug, Clone, Default)]
pub struct ParticleSnapshot {
    slots: Vec<Particle>,
    live: usize,
}

impl ParticleSnapshot {
    /// Create a snapshot with `max_particles` slots and nothing live.
    pub fn with_capacity(max_particles: usize) -> Self {
        Self {
            slots: vec![Particle::default(); max_particles],
            live: 0,
        }
    }

    /// Build a snapshot whose slots are exactly `particles`, all live.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let live = particles.len();
        Self {
            slots: particles,
            live,
        }
    }

    /// Build a fully live snapshot from bare positions.
    pub fn from_positions(positions: &[Vec3]) -> Self {
        Self::from_particles(positions.iter().copied().map(Particle::at).collect())
    }

    /// Grow storage to hold at least `max_particles`. Never shrinks.
    ///
    /// Returns `true` if storage was reallocated.
    pub fn ensure_capacity(&mut self, max_particles: usize) -> bool {
        if self.slots.len() >= max_particles {
            return false;
        }
        log::debug!(
            "Growing particle snapshot from {} to {} slots",
            self.slots.len(),
            max_particles
        );
        self.slots.resize(max_particles, Particle::default());
        true
    }

    /// Number of slots available to the host.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live particles this frame.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Mutable access to every slot, for the host to fill.
    pub fn slots_mut(&mut self) -> &mut [Particle] {
        &mut self.slots
    }

    /// Declare how many leading slots hold live particles.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`capacity`](Self::capacity). Reading past
    /// the written slots would feed stale particles into the frame.
    pub fn set_live_count(&mut self, count: usize) {
        assert!(
            count <= self.slots.len(),
            "live particle count {} exceeds snapshot capacity {}",
            count,
            self.slots.len()
        );
        self.live = count;
    }

    /// The live particles.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.slots[..self.live]
    }

    /// Position of live particle `index`.
    #[inline]
    pub fn position(&self, index: usize) -> Vec3 {
        self.particles()[index].position
    }
}
