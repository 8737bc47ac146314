//! Line segment attributes and the pooled line handles that display them.
//!
//! The effect decides which lines exist and what they look like. Drawing them
//! is the host's job: it hands the effect a [`LinePool`] of its own renderable
//! line objects, and each frame the segments are written into the pool in
//! scan order. Surplus handles are deactivated, never destroyed, so a frame
//! with fewer lines costs no deallocation and the next busy frame costs no
//! allocation.

use glam::{Vec3, Vec4};

use crate::blend::{blend_color, blend_f32};
use crate::config::LineTemplate;
use crate::neighbors::LinePair;
use crate::particle::Particle;

/// Everything a host line renderer needs for one connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub start_width: f32,
    pub end_width: f32,
    pub start_color: Vec4,
    pub end_color: Vec4,
    /// Endpoints are in world space rather than relative to the simulation
    /// transform.
    pub use_world_space: bool,
}

/// Blend settings shared by every segment in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub template: LineTemplate,
    pub size_blend: f32,
    pub color_blend: f32,
    pub use_world_space: bool,
}

impl LineStyle {
    /// Derive the segment for an accepted pair.
    pub fn segment(&self, first: &Particle, second: &Particle) -> LineSegment {
        LineSegment {
            start: first.position,
            end: second.position,
            start_width: blend_f32(self.template.start_width, first.size, self.size_blend),
            end_width: blend_f32(self.template.end_width, second.size, self.size_blend),
            start_color: blend_color(self.template.start_color, first.color, self.color_blend),
            end_color: blend_color(self.template.end_color, second.color, self.color_blend),
            use_world_space: self.use_world_space,
        }
    }

    /// Fill `out` with one segment per line, in line order.
    pub fn build_segments(&self, particles: &[Particle], lines: &[LinePair], out: &mut Vec<LineSegment>) {
        out.clear();
        out.extend(
            lines
                .iter()
                .map(|line| self.segment(&particles[line.a], &particles[line.b])),
        );
    }
}

/// A host-owned renderable line.
pub trait LineHandle {
    /// Show or hide the line.
    fn set_active(&mut self, active: bool);

    /// Copy the segment's attributes onto the renderable.
    fn apply(&mut self, segment: &LineSegment);
}

/// Reuse-or-allocate pool of line handles, bound by scan index.
#[derive(Debug)]
pub struct LinePool<H> {
    handles: Vec<H>,
    active: Vec<bool>,
}

impl<H> Default for LinePool<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
            active: Vec::new(),
        }
    }
}

impl<H: LineHandle> LinePool<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle bound to `index`, creating handles with `make` as needed.
    ///
    /// New handles start inactive; only the handle at `index` is activated.
    pub fn acquire(&mut self, index: usize, mut make: impl FnMut() -> H) -> &mut H {
        while self.handles.len() <= index {
            let mut handle = make();
            handle.set_active(false);
            self.handles.push(handle);
            self.active.push(false);
        }
        let handle = &mut self.handles[index];
        if !self.active[index] {
            handle.set_active(true);
            self.active[index] = true;
        }
        handle
    }

    /// Deactivate every handle from `index` on. Handles are kept.
    pub fn deactivate_from(&mut self, index: usize) {
        let tail = self.handles.iter_mut().zip(self.active.iter_mut()).skip(index);
        for (handle, active) in tail.filter(|(_, active)| **active) {
            handle.set_active(false);
            *active = false;
        }
    }

    /// Bind `segments` to handles `0..segments.len()` and hide the rest.
    pub fn sync(&mut self, segments: &[LineSegment], mut make: impl FnMut() -> H) {
        for (index, segment) in segments.iter().enumerate() {
            self.acquire(index, &mut make).apply(segment);
        }
        self.deactivate_from(segments.len());
    }

    /// Number of handles currently bound to a live line.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&active| active).count()
    }

    /// Total handles ever created.
    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }
}
