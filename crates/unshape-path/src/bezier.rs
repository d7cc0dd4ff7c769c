//! Curve evaluation helpers.
//!
//! Point evaluation for quadratic and cubic Bezier curves, the chord-distance
//! metric used by adaptive flattening, and the polynomial form of a uniform
//! cubic B-spline window.

use glam::Vec2;

/// Evaluates a quadratic Bezier curve at parameter `t`.
///
/// # Arguments
///
/// * `p0` - Start point
/// * `p1` - Control point
/// * `p2` - End point
/// * `t` - Parameter in [0, 1]
///
/// # Example
///
/// ```
/// use unshape_path::bezier::quadratic_point;
/// use glam::Vec2;
///
/// let mid = quadratic_point(Vec2::ZERO, Vec2::new(0.5, 1.0), Vec2::X, 0.5);
/// assert!((mid - Vec2::new(0.5, 0.5)).length() < 1e-6);
/// ```
#[inline]
pub fn quadratic_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    p0 * mt2 + p1 * (2.0 * mt * t) + p2 * t2
}

/// Evaluates a cubic Bezier curve at parameter `t`.
///
/// # Arguments
///
/// * `p0` - Start point
/// * `p1` - First control point
/// * `p2` - Second control point
/// * `p3` - End point
/// * `t` - Parameter in [0, 1]
#[inline]
pub fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;
    let t2 = t * t;
    let t3 = t2 * t;
    p0 * mt3 + p1 * (3.0 * mt2 * t) + p2 * (3.0 * mt * t2) + p3 * t3
}

/// Perpendicular distance from `point` to the chord through `a` and `b`.
///
/// Falls back to the plain distance to `a` when the chord has no length.
#[inline]
pub fn chord_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let chord = b - a;
    let len = chord.length();
    if len < 1e-12 {
        return point.distance(a);
    }
    chord.perp_dot(point - a).abs() / len
}

/// Polynomial coefficients of one uniform cubic B-spline window.
///
/// The window `p0..p3` evaluates to `c0 + t * (c1 + t * (c2 + t * c3))`, where
/// the returned array is `[c0, c1, c2, c3]`.
pub fn bspline_coefficients(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> [Vec2; 4] {
    let c3 = (-p0 + 3.0 * p1 - 3.0 * p2 + p3) / 6.0;
    let c2 = (3.0 * p0 - 6.0 * p1 + 3.0 * p2) / 6.0;
    let c1 = (-3.0 * p0 + 3.0 * p2) / 6.0;
    let c0 = (p0 + 4.0 * p1 + p2) / 6.0;
    [c0, c1, c2, c3]
}

/// Evaluates B-spline window coefficients at `t` using Horner's scheme.
#[inline]
pub fn bspline_point(coefficients: &[Vec2; 4], t: f32) -> Vec2 {
    let [c0, c1, c2, c3] = *coefficients;
    c0 + t * (c1 + t * (c2 + t * c3))
}
