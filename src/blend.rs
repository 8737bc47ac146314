//! Template-to-particle blending.
//!
//! Line widths, line colors and mesh vertex colors all interpolate between a
//! configured base value and the particle's own sampled value. The endpoints
//! are exact: a factor of 0 returns the base untouched and a factor of 1
//! returns the particle value untouched, which a naive `a + (b - a) * t`
//! does not guarantee in floating point.

use glam::Vec4;

/// Opaque white, the base color for mesh vertices.
pub const WHITE: Vec4 = Vec4::ONE;

/// Clamp a blend factor into `[0, 1]`. NaN maps to 0.
#[inline]
pub fn clamp_factor(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// Blend a scalar from `base` toward `particle` by `t`.
#[inline]
pub fn blend_f32(base: f32, particle: f32, t: f32) -> f32 {
    let t = clamp_factor(t);
    if t == 0.0 {
        base
    } else if t == 1.0 {
        particle
    } else {
        base * (1.0 - t) + particle * t
    }
}

/// Blend an RGBA color from `base` toward `particle` by `t`.
#[inline]
pub fn blend_color(base: Vec4, particle: Vec4, t: f32) -> Vec4 {
    let t = clamp_factor(t);
    if t == 0.0 {
        base
    } else if t == 1.0 {
        particle
    } else {
        base * (1.0 - t) + particle * t
    }
}
