//! Polyline stroking.
//!
//! Converts flattened vertices into GPU-ready stroke geometry.
//!
//! # Modes
//!
//! - **Thin** (width <= 1): a line list, one vertex pair per segment.
//! - **Thick** (width > 1): a triangle strip with one vertex pair per input
//!   vertex. Interior corners are mitered; open ends get butt caps.
//!
//! Miters are not limited, so very sharp corners produce long spikes.
//!
//! # Usage
//!
//! ```
//! use unshape_path::stroke::{StrokeGeometry, stroke_polyline};
//! use glam::Vec2;
//!
//! let points = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
//!
//! let thin = stroke_polyline(&points, points.len(), 1.0, false);
//! assert!(matches!(thin, StrokeGeometry::Lines(_)));
//! assert_eq!(thin.vertex_count(), 4);
//!
//! let thick = stroke_polyline(&points, points.len(), 2.0, false);
//! assert!(matches!(thick, StrokeGeometry::TriangleStrip(_)));
//! assert_eq!(thick.vertex_count(), 6);
//! ```

use glam::Vec2;

/// Vertex buffer for one stroke draw.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeGeometry {
    /// Disconnected segments, two vertices each.
    Lines(Vec<Vec2>),
    /// Vertex pairs straddling the polyline, drawn as a triangle strip.
    TriangleStrip(Vec<Vec2>),
}

impl Default for StrokeGeometry {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl StrokeGeometry {
    /// Returns the vertex buffer.
    pub fn vertices(&self) -> &[Vec2] {
        match self {
            Self::Lines(vertices) | Self::TriangleStrip(vertices) => vertices,
        }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Returns true if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices().is_empty()
    }
}

/// Strokes the first `count` vertices of a polyline.
///
/// `count` is clamped to `vertices.len()`. `width` is the offset applied on
/// each side of the line in thick mode. Closed polylines connect the last
/// vertex back to the first.
///
/// Fewer than two usable vertices logs a warning and returns empty geometry.
pub fn stroke_polyline(
    vertices: &[Vec2],
    count: usize,
    width: f32,
    closed: bool,
) -> StrokeGeometry {
    let count = count.min(vertices.len());
    if count < 2 {
        log::warn!("polyline needs at least 2 points, got {count}");
        return StrokeGeometry::default();
    }
    let points = &vertices[..count];

    match (width <= 1.0, closed) {
        (true, false) => StrokeGeometry::Lines(thin_open(points)),
        (true, true) => StrokeGeometry::Lines(thin_closed(points)),
        (false, false) => StrokeGeometry::TriangleStrip(thick_open(points, width)),
        (false, true) => StrokeGeometry::TriangleStrip(thick_closed(points, width)),
    }
}

/// Triangulates a convex polygon as a fan around its first vertex.
///
/// Fewer than three vertices logs a warning and returns an empty list.
pub fn fan_triangles(vertices: &[Vec2]) -> Vec<Vec2> {
    if vertices.len() < 3 {
        log::warn!("polygon needs at least 3 points, got {}", vertices.len());
        return Vec::new();
    }

    vertices
        .windows(2)
        .skip(1)
        .flat_map(|w| [vertices[0], w[0], w[1]])
        .collect()
}

fn thin_open(points: &[Vec2]) -> Vec<Vec2> {
    points.windows(2).flat_map(|w| [w[0], w[1]]).collect()
}

fn thin_closed(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    (0..n).flat_map(|i| [points[i], points[(i + 1) % n]]).collect()
}

fn thick_open(points: &[Vec2], width: f32) -> Vec<Vec2> {
    let n = points.len();
    let mut out = Vec::with_capacity(n * 2);

    for i in 0..n {
        let pair = if i == 0 {
            butt_pair(points[0], segment_normal(points[0], points[1]), width)
        } else if i == n - 1 {
            butt_pair(points[i], segment_normal(points[i - 1], points[i]), width)
        } else {
            miter_pair(
                points[i],
                segment_normal(points[i - 1], points[i]),
                segment_normal(points[i], points[i + 1]),
                width,
            )
        };
        out.extend(pair);
    }
    out
}

fn thick_closed(points: &[Vec2], width: f32) -> Vec<Vec2> {
    let n = points.len();
    let mut out = Vec::with_capacity((n + 1) * 2);

    // One extra pair repeats the first corner to close the strip.
    for i in 0..=n {
        let index = i % n;
        let prev = points[(index + n - 1) % n];
        let next = points[(index + 1) % n];
        out.extend(miter_pair(
            points[index],
            segment_normal(prev, points[index]),
            segment_normal(points[index], next),
            width,
        ));
    }
    out
}

/// Left-hand unit normal of the segment `a -> b`, zero if degenerate.
fn segment_normal(a: Vec2, b: Vec2) -> Vec2 {
    (b - a).normalize_or_zero().perp()
}

fn butt_pair(point: Vec2, normal: Vec2, width: f32) -> [Vec2; 2] {
    [point + normal * width, point - normal * width]
}

fn miter_pair(point: Vec2, normal_prev: Vec2, normal_next: Vec2, width: f32) -> [Vec2; 2] {
    let miter = (normal_prev + normal_next).normalize_or_zero();
    if miter == Vec2::ZERO {
        // Full reversal: the miter direction is undefined.
        return butt_pair(point, normal_prev, width);
    }

    let along_prev = miter.dot(normal_prev);
    let along_next = miter.dot(normal_next);
    if along_prev.abs() < 1e-6 || along_next.abs() < 1e-6 {
        return butt_pair(point, miter, width);
    }

    [
        point + miter * (width / along_prev),
        point - miter * (width / along_next),
    ]
}
