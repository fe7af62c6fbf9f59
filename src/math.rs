//! Easing and interpolation helpers shared by the camera path and tweens.

use glam::DVec3;

pub fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Smoothstep: zero first derivative at both ends, so scroll-driven camera
/// motion has no velocity discontinuity at waypoint boundaries.
pub fn smoothstep(t: f64) -> f64 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

/// Quadratic ease-in/out used for cinematic transitions.
pub fn power2_in_out(t: f64) -> f64 {
    let t = clamp01(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

pub fn lerp_vec(start: DVec3, end: DVec3, t: f64) -> DVec3 {
    start.lerp(end, t)
}
