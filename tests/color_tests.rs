//! Colour tests
//!
//! Tests for:
//! - HSV to RGB sector conversion, including sector boundaries
//! - Zero saturation and hue wrap-around
//! - Vibrant palette draws and darkening
//! - Colour variance bounds and clamping

use forge::core::color::{Hsv, clamp_rgba, hsv_to_rgb, is_unit_rgba, vibrant_hsv};
use forge::core::random::seeded;
use forge::resources::{ColorVariance, Material};
use glam::{Vec3, Vec4};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn rgb_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

// ============================================================================
// HSV conversion
// ============================================================================

#[test]
fn hsv_primary_hues() {
    assert!(rgb_approx(hsv_to_rgb(0.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0)));
    assert!(rgb_approx(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 0.0)));
    assert!(rgb_approx(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Vec3::new(0.0, 0.0, 1.0)));
}

#[test]
fn hsv_sector_boundaries() {
    // Each sixth of the hue circle starts on a pure or secondary colour.
    let expected = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
    ];
    for (i, rgb) in expected.iter().enumerate() {
        let h = i as f32 / 6.0;
        let got = hsv_to_rgb(h, 1.0, 1.0);
        assert!(rgb_approx(got, *rgb), "h = {h}: got {got}, expected {rgb}");
    }
}

#[test]
fn hsv_sector_midpoints() {
    // h = 1/12 is halfway through sector 0: t = v(1 - s(1 - 0.5)).
    assert!(rgb_approx(hsv_to_rgb(1.0 / 12.0, 1.0, 1.0), Vec3::new(1.0, 0.5, 0.0)));
    // h = 3/12 is halfway through sector 1: q = v(1 - s * 0.5).
    assert!(rgb_approx(hsv_to_rgb(3.0 / 12.0, 1.0, 1.0), Vec3::new(0.5, 1.0, 0.0)));
}

#[test]
fn hsv_zero_saturation_is_grey() {
    for h in [0.0, 0.25, 0.5, 0.99] {
        assert_eq!(hsv_to_rgb(h, 0.0, 0.4), Vec3::splat(0.4));
    }
}

#[test]
fn hsv_hue_one_wraps_to_red() {
    assert!(rgb_approx(hsv_to_rgb(1.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0)));
}

#[test]
fn hsv_partial_saturation_and_value() {
    // p = v(1 - s) = 0.25 with s = 0.5, v = 0.5.
    let rgb = hsv_to_rgb(0.0, 0.5, 0.5);
    assert!(rgb_approx(rgb, Vec3::new(0.5, 0.25, 0.25)));
}

#[test]
fn hsv_is_pure() {
    assert_eq!(hsv_to_rgb(0.37, 0.8, 0.6), hsv_to_rgb(0.37, 0.8, 0.6));
}

// ============================================================================
// Palette helpers
// ============================================================================

#[test]
fn vibrant_hsv_stays_in_range() {
    let mut rng = seeded(11);
    for _ in 0..200 {
        let hsv = vibrant_hsv(&mut rng);
        assert!((0.0..1.0).contains(&hsv.h));
        assert!((0.5..1.0).contains(&hsv.s));
        assert!((0.5..1.0).contains(&hsv.v));
        assert!(is_unit_rgba(hsv.to_rgba()));
    }
}

#[test]
fn darken_keeps_hue() {
    let base = Hsv::new(0.3, 0.9, 0.8);
    let dark = base.darken(0.8, 0.8);
    assert_eq!(dark.h, base.h);
    assert!(approx(dark.s, 0.72));
    assert!(approx(dark.v, 0.64));
}

#[test]
fn clamp_rgba_limits_channels() {
    let clamped = clamp_rgba(Vec4::new(-0.5, 0.5, 1.5, 1.0));
    assert_eq!(clamped, Vec4::new(0.0, 0.5, 1.0, 1.0));
}

// ============================================================================
// Colour variance
// ============================================================================

#[test]
fn symmetric_variance_is_bounded() {
    let mut rng = seeded(3);
    let base = Vec4::new(0.5, 0.5, 0.5, 1.0);
    let variance = ColorVariance::symmetric(Vec3::splat(0.1));
    for _ in 0..200 {
        let c = variance.apply(base, &mut rng);
        for channel in [c.x, c.y, c.z] {
            assert!((0.4 - EPSILON..=0.6 + EPSILON).contains(&channel));
        }
        assert_eq!(c.w, 1.0);
    }
}

#[test]
fn additive_variance_only_brightens() {
    let mut rng = seeded(5);
    let base = Vec4::new(0.1, 0.5, 0.1, 1.0);
    let variance = ColorVariance::additive(Vec3::new(0.0, 0.5, 0.0));
    for _ in 0..200 {
        let c = variance.apply(base, &mut rng);
        assert_eq!(c.x, 0.1);
        assert_eq!(c.z, 0.1);
        assert!((0.5..=1.0).contains(&c.y));
    }
}

#[test]
fn variance_clamps_to_unit_range() {
    let mut rng = seeded(8);
    let variance = ColorVariance::symmetric(Vec3::splat(0.5));
    for _ in 0..100 {
        let c = variance.apply(Vec4::new(0.95, 0.05, 0.5, 1.0), &mut rng);
        assert!(is_unit_rgba(c));
    }
}

#[test]
fn material_rejects_out_of_range_colour() {
    let bad = Material::new("Bad").with_color(Vec4::new(1.2, 0.0, 0.0, 1.0));
    assert!(bad.validate().is_err());
    assert!(Material::new("Good").with_rgb(Vec3::splat(0.3)).validate().is_ok());
}
