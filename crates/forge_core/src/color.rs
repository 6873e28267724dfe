//! Colour helpers.
//!
//! Colours are linear RGB(A) in `[0, 1]` per channel, stored as `glam`
//! vectors. [`hsv_to_rgb`] is the sector conversion used for vibrant
//! foliage palettes; it is a pure function so identical inputs always give
//! identical outputs.

use glam::{Vec3, Vec4};
use rand::Rng;

/// Hue, saturation and value, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    #[must_use]
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Scales saturation and value, keeping the hue.
    #[must_use]
    pub fn darken(self, saturation: f32, value: f32) -> Self {
        Self {
            h: self.h,
            s: self.s * saturation,
            v: self.v * value,
        }
    }

    #[must_use]
    pub fn to_rgb(self) -> Vec3 {
        hsv_to_rgb(self.h, self.s, self.v)
    }

    #[must_use]
    pub fn to_rgba(self) -> Vec4 {
        self.to_rgb().extend(1.0)
    }
}

/// Converts HSV to RGB with the six-sector algorithm.
///
/// `i = floor(h * 6) mod 6`, `f = h * 6 - floor(h * 6)`,
/// `p = v(1 - s)`, `q = v(1 - s f)`, `t = v(1 - s(1 - f))`, and the sector
/// picks the permutation of `{v, t, p, q}`. Zero saturation is grey.
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    if s == 0.0 {
        return Vec3::splat(v);
    }

    let scaled = h * 6.0;
    let sector = scaled.floor();
    let f = scaled - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

/// Draws a saturated, bright colour: any hue, saturation and value in `[0.5, 1)`.
pub fn vibrant_hsv<R: Rng + ?Sized>(rng: &mut R) -> Hsv {
    Hsv {
        h: rng.random_range(0.0..1.0),
        s: rng.random_range(0.5..1.0),
        v: rng.random_range(0.5..1.0),
    }
}

/// Clamps every channel into `[0, 1]`.
#[must_use]
pub fn clamp_rgba(color: Vec4) -> Vec4 {
    color.clamp(Vec4::ZERO, Vec4::ONE)
}

/// True when every channel is finite and within `[0, 1]`.
#[must_use]
pub fn is_unit_rgba(color: Vec4) -> bool {
    color.is_finite() && color.cmpge(Vec4::ZERO).all() && color.cmple(Vec4::ONE).all()
}
