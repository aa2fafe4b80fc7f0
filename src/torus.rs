/*
 * Torus Module
 *
 * Wrap-around arithmetic for the toroidal world. Every steering force and
 * the neighbor query measure offsets through these helpers, so a boid near
 * the right edge sees a boid near the left edge as a close neighbor.
 */

use nannou::prelude::*;

// Map any value into [0, bound)
#[inline]
pub fn wrap(x: f32, bound: f32) -> f32 {
    let wrapped = x.rem_euclid(bound);
    // rem_euclid can round up to `bound` for tiny negative inputs
    if wrapped >= bound {
        0.0
    } else {
        wrapped
    }
}

/// Signed offset from `from` to `to` along one axis, taking the shorter way
/// around a loop of length `bound`.
///
/// The direct difference is kept while its magnitude is at most `bound / 2`;
/// otherwise whole multiples of `bound` are removed so the result never
/// exceeds `bound / 2` in magnitude.
#[inline]
pub fn wrapped_delta_1d(from: f32, to: f32, bound: f32) -> f32 {
    let delta = to - from;
    if delta.abs() > bound / 2.0 {
        delta - bound * (delta / bound).round()
    } else {
        delta
    }
}

// Per-axis wrapped offset from `from` to `to`
#[inline]
pub fn wrapped_delta(from: Point2, to: Point2, width: f32, height: f32) -> Vec2 {
    vec2(
        wrapped_delta_1d(from.x, to.x, width),
        wrapped_delta_1d(from.y, to.y, height),
    )
}

// Euclidean length of the wrapped offset
#[inline]
pub fn wrapped_distance(a: Point2, b: Point2, width: f32, height: f32) -> f32 {
    wrapped_delta(a, b, width, height).length()
}

// Wrap a position back onto the torus
#[inline]
pub fn wrap_point(p: Point2, width: f32, height: f32) -> Point2 {
    pt2(wrap(p.x, width), wrap(p.y, height))
}
