//! Curve flattening.
//!
//! Converts curve commands into line-segment vertices:
//!
//! - **Bezier curves** are subdivided adaptively, bisecting at the parameter
//!   midpoint up to [`FlattenConfig::max_depth`] levels. A quadratic interval
//!   is accepted once its midpoint lies within the tolerance of the chord. A
//!   cubic interval also needs both inner control points within the tolerance,
//!   since an inflected cubic can cross its chord exactly at the midpoint.
//! - **Tangent arcs** are sampled at a fixed number of uniform angle steps.
//! - **Cubic B-splines** are sampled at a fixed number of steps per window.
//!
//! Flattening never re-emits the start point of a curve: the caller already
//! holds it as the last vertex of its path.

use crate::bezier::{bspline_coefficients, bspline_point, chord_distance, quadratic_point};
use crate::error::{PathError, Result};
use crate::{DEFAULT_ARC_SEGMENTS, DEFAULT_FLATTEN_DEPTH};
use glam::Vec2;
use std::f32::consts::TAU;

/// Determinant below which two tangent directions count as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Configuration for curve flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlattenConfig {
    /// Maximum bisection depth for Bezier curves (at most `2^max_depth` segments).
    pub max_depth: u32,
    /// Number of angle steps used for tangent arcs.
    pub arc_segments: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_FLATTEN_DEPTH,
            arc_segments: DEFAULT_ARC_SEGMENTS,
        }
    }
}

impl FlattenConfig {
    /// Sets the maximum bisection depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the number of arc segments.
    pub fn with_arc_segments(mut self, segments: usize) -> Self {
        self.arc_segments = segments;
        self
    }
}

/// Flattens a cubic Bezier curve.
///
/// Emits every vertex after `p0`, ending with `p3` exactly once.
///
/// # Example
///
/// ```
/// use unshape_path::flatten::{FlattenConfig, flatten_cubic};
/// use glam::Vec2;
///
/// let mut points = Vec::new();
/// flatten_cubic(
///     Vec2::new(10.0, 10.0),
///     Vec2::new(30.0, 60.0),
///     Vec2::new(60.0, 60.0),
///     Vec2::new(80.0, 10.0),
///     0.5,
///     &FlattenConfig::default(),
///     &mut |p| points.push(p),
/// );
/// assert_eq!(points.last(), Some(&Vec2::new(80.0, 10.0)));
/// ```
pub fn flatten_cubic(
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    p3: Vec2,
    tolerance: f32,
    config: &FlattenConfig,
    emit: &mut impl FnMut(Vec2),
) {
    subdivide_cubic([p0, p1, p2, p3], tolerance, 0, config.max_depth, emit);
    emit(p3);
}

/// Flattens a quadratic Bezier curve.
///
/// Emits every vertex after `p0`, ending with `p2` exactly once.
pub fn flatten_quadratic(
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    tolerance: f32,
    config: &FlattenConfig,
    emit: &mut impl FnMut(Vec2),
) {
    let curve = |t: f32| quadratic_point(p0, p1, p2, t);
    subdivide(&curve, (0.0, p0), (1.0, p2), tolerance, 0, config.max_depth, emit);
    emit(p2);
}

/// Bisects `[left, right]` while the midpoint strays from the chord.
///
/// Midpoints are emitted in parameter order; the interval ends are not.
fn subdivide(
    curve: &impl Fn(f32) -> Vec2,
    (left, left_point): (f32, Vec2),
    (right, right_point): (f32, Vec2),
    tolerance: f32,
    depth: u32,
    max_depth: u32,
    emit: &mut impl FnMut(Vec2),
) {
    if depth >= max_depth {
        return;
    }

    let t = (left + right) * 0.5;
    let mid = curve(t);
    if chord_distance(mid, left_point, right_point) <= tolerance {
        return;
    }

    subdivide(curve, (left, left_point), (t, mid), tolerance, depth + 1, max_depth, emit);
    emit(mid);
    subdivide(curve, (t, mid), (right, right_point), tolerance, depth + 1, max_depth, emit);
}

/// Bisects a cubic with de Casteljau until its control polygon is flat.
///
/// The curve lies in the hull of its control points, so accepting only when
/// both inner points are within `tolerance` of the chord bounds the deviation
/// of the whole interval. Split points are emitted in parameter order.
fn subdivide_cubic(
    [p0, p1, p2, p3]: [Vec2; 4],
    tolerance: f32,
    depth: u32,
    max_depth: u32,
    emit: &mut impl FnMut(Vec2),
) {
    if depth >= max_depth {
        return;
    }
    if chord_distance(p1, p0, p3) <= tolerance && chord_distance(p2, p0, p3) <= tolerance {
        return;
    }

    let p01 = (p0 + p1) * 0.5;
    let p12 = (p1 + p2) * 0.5;
    let p23 = (p2 + p3) * 0.5;
    let p012 = (p01 + p12) * 0.5;
    let p123 = (p12 + p23) * 0.5;
    let mid = (p012 + p123) * 0.5;

    subdivide_cubic([p0, p01, p012, mid], tolerance, depth + 1, max_depth, emit);
    emit(mid);
    subdivide_cubic([mid, p123, p23, p3], tolerance, depth + 1, max_depth, emit);
}

/// Computes the points of a circular arc tangent to two lines.
///
/// The first line runs from `current` through `tangent1`, the second from
/// `tangent1` through `tangent2`. Both lines are offset by `radius` along
/// their left-hand normals and intersected to find the circle center, so a
/// positive radius places the circle left of the direction of travel and
/// sweeps counter-clockwise, a negative one places it on the right and sweeps
/// clockwise.
///
/// The sign must match the turn. A positive radius on a right-hand turn puts
/// the circle outside the corner, and the arc loops 270 degrees past it; use a
/// negative radius for right turns.
///
/// Returns `segments + 1` points ordered along the direction of travel. The
/// first and last points are the exact tangent points on each line.
///
/// A zero radius yields the corner `tangent1` alone.
///
/// # Errors
///
/// [`PathError::DegenerateArc`] when either tangent line has no length or the
/// two lines are parallel.
pub fn tangent_arc(
    current: Vec2,
    tangent1: Vec2,
    tangent2: Vec2,
    radius: f32,
    segments: usize,
) -> Result<Vec<Vec2>> {
    let dir1 = (tangent1 - current).normalize_or_zero();
    let dir2 = (tangent2 - tangent1).normalize_or_zero();
    if dir1 == Vec2::ZERO || dir2 == Vec2::ZERO {
        return Err(PathError::DegenerateArc);
    }

    let det = dir1.perp_dot(dir2);
    if det.abs() < PARALLEL_EPSILON {
        return Err(PathError::DegenerateArc);
    }

    if radius == 0.0 {
        return Ok(vec![tangent1]);
    }

    let normal1 = dir1.perp();
    let normal2 = dir2.perp();

    // Offset lines: `origin1 + s * dir1` and `origin2 + u * dir2`.
    let origin1 = current + normal1 * radius;
    let origin2 = tangent1 + normal2 * radius;
    let s = (origin2 - origin1).perp_dot(dir2) / det;
    let center = origin1 + dir1 * s;

    let arc_start = center - normal1 * radius;
    let arc_end = center - normal2 * radius;

    let mut start_angle = angle_of(arc_start - center);
    let mut stop_angle = angle_of(arc_end - center);
    if radius < 0.0 {
        std::mem::swap(&mut start_angle, &mut stop_angle);
    }
    if start_angle > stop_angle {
        stop_angle += TAU;
    }

    let segments = segments.max(1);
    let r = radius.abs();
    let step = (stop_angle - start_angle) / segments as f32;
    let mut points: Vec<Vec2> = (0..=segments)
        .map(|i| {
            let angle = start_angle + step * i as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * r
        })
        .collect();

    if radius < 0.0 {
        points.reverse();
    }

    // Snap the caps onto the tangent lines.
    points[0] = arc_start;
    points[segments] = arc_end;

    Ok(points)
}

/// Angle of `v` normalized into `[0, 2π)`.
fn angle_of(v: Vec2) -> f32 {
    let angle = v.y.atan2(v.x);
    if angle < 0.0 {
        (angle + TAU) % TAU
    } else {
        angle % TAU
    }
}

/// Approximates a uniform cubic B-spline with a polyline.
///
/// Every window of four consecutive control points contributes
/// `segments_per_curve` samples at `t = i / segments_per_curve` for
/// `i in 0..segments_per_curve`. A window's first sample coincides with the
/// previous window's end, so the polyline is continuous.
///
/// # Errors
///
/// [`PathError::NotEnoughPoints`] when fewer than 4 control points are given.
///
/// # Example
///
/// ```
/// use unshape_path::flatten::approximate_cubic_bspline;
/// use glam::Vec2;
///
/// let control = [Vec2::ZERO, Vec2::new(1.0, 2.0), Vec2::new(3.0, 2.0), Vec2::new(4.0, 0.0)];
/// let points = approximate_cubic_bspline(&control, 10).unwrap();
/// assert_eq!(points.len(), 10);
/// ```
pub fn approximate_cubic_bspline(
    control_points: &[Vec2],
    segments_per_curve: usize,
) -> Result<Vec<Vec2>> {
    if control_points.len() < 4 {
        return Err(PathError::NotEnoughPoints {
            required: 4,
            got: control_points.len(),
        });
    }

    let segments = segments_per_curve.max(1);
    let windows = control_points.len() - 3;
    let mut points = Vec::with_capacity(windows * segments);

    for window in control_points.windows(4) {
        let coefficients = bspline_coefficients(window[0], window[1], window[2], window[3]);
        points.push(coefficients[0]);
        for i in 1..segments {
            let t = i as f32 / segments as f32;
            points.push(bspline_point(&coefficients, t));
        }
    }

    Ok(points)
}
