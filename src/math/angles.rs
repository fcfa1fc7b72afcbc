//! Angle helpers for wind directions
//!
//! Directions wrap at 2π, so averaging or interpolating them must go through
//! their sine/cosine pair. See
//! <https://en.wikipedia.org/wiki/Mean_of_circular_quantities>.

use std::f64::consts::{PI, TAU};

/// Wrap an angle into `[0, 2π)`
pub fn wrap_to_2pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle into `[-π, π)`
pub fn wrap_to_pi(angle: f64) -> f64 {
    wrap_to_2pi(angle + PI) - PI
}

/// Recombine a (cos, sin) pair into an angle in `[0, 2π)`.
///
/// The pair does not need to be normalized, which is what makes this usable
/// on linearly interpolated cosines and sines.
pub fn from_cos_sin_to_0_2pi(cos: f64, sin: f64) -> f64 {
    wrap_to_2pi(sin.atan2(cos))
}

/// Circular mean of a set of angles (radians), in `[0, 2π)`.
///
/// Returns `None` for an empty input or when the resultant vanishes (for
/// example two opposite directions).
pub fn circular_mean(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    let (sin_sum, cos_sum) = angles
        .iter()
        .fold((0.0, 0.0), |(s, c), a| (s + a.sin(), c + a.cos()));

    if sin_sum.hypot(cos_sum) < 1e-12 * angles.len() as f64 {
        return None;
    }
    Some(from_cos_sin_to_0_2pi(cos_sum, sin_sum))
}

/// Convert a meteorological wind direction to a structural azimuth.
///
/// `beta_db` is the compass bearing the wind blows *from* (clockwise from
/// north). `x_axis_bearing` is the compass bearing of the global X axis; the
/// global Y axis lies 90° counter-clockwise of it. The returned azimuth, in
/// `[0, 2π)`, is the direction the wind blows *towards*, measured
/// counter-clockwise from global X.
pub fn beta_0_from_compass(beta_db: f64, x_axis_bearing: f64) -> f64 {
    wrap_to_2pi(x_axis_bearing - beta_db - PI)
}

/// Inverse of [`beta_0_from_compass`]
pub fn compass_from_beta_0(beta_0: f64, x_axis_bearing: f64) -> f64 {
    wrap_to_2pi(x_axis_bearing - beta_0 - PI)
}
