//! 2D path geometry for GPU fill and stroke.
//!
//! Paths are built from lines, Bezier curves and tangent arcs, flattened on the
//! fly into polylines. Filled paths are split into vertical bands small enough
//! for a fixed-size shader edge array; stroked paths become line lists or
//! mitered triangle strips.
//!
//! # Example
//!
//! ```
//! use unshape_path::{Path, RenderContext};
//! use glam::Vec2;
//!
//! let mut ctx = RenderContext::new();
//! let mut path = Path::from_start(Vec2::new(30.0, 20.0));
//! path.line_to(Vec2::new(85.0, 5.0));
//! path.line_to(Vec2::new(85.0, 75.0));
//! path.close();
//!
//! let draws = ctx.fill(&mut path).unwrap();
//! assert_eq!(draws.len(), 1);
//! ```

use glam::Vec2;

pub mod bezier;
mod context;
mod error;
pub mod fill;
pub mod flatten;
pub mod partition;
mod path;
mod state;
pub mod stroke;

pub use context::{RenderContext, StateScope};
pub use error::{PathError, Result};
pub use fill::{FillDraw, FillRule};
pub use flatten::FlattenConfig;
pub use partition::{EdgePartitioner, Partition, PartitionConfig, PartitionPool};
pub use path::Path;
pub use state::{RenderState, StateStack};
pub use stroke::StrokeGeometry;

/// Vertex ceiling of one fill draw; also the shader's edge array size.
pub const MAX_VERTICES: usize = 512;

/// Default chord tolerance for curve flattening.
pub const DEFAULT_CURVE_PRECISION: f32 = 0.5;

/// Default number of released partitions kept for reuse.
pub const DEFAULT_POOL_CAPACITY: usize = 256;

/// Default split depth before partitions are truncated.
pub const DEFAULT_PARTITION_DEPTH: u32 = 8;

/// Default recursion depth for Bezier subdivision.
pub const DEFAULT_FLATTEN_DEPTH: u32 = 6;

/// Default number of segments per tangent arc.
pub const DEFAULT_ARC_SEGMENTS: usize = 20;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Degenerate box around one point.
    pub fn from_point(point: Vec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), Self::including))
    }

    /// Returns the box grown to contain `point`.
    pub fn including(self, point: Vec2) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Returns true if `point` lies inside or on the boundary.
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// A directed line segment between two consecutive path vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
}

impl Edge {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn min_y(&self) -> f32 {
        self.start.y.min(self.end.y)
    }

    pub fn max_y(&self) -> f32 {
        self.start.y.max(self.end.y)
    }

    /// Returns true if the edge's vertical extent touches `[start, end]`.
    pub fn intersects_band(&self, start: f32, end: f32) -> bool {
        self.min_y() <= end && self.max_y() >= start
    }
}


// ============================================================================
// Invariant tests
// ============================================================================

/// Invariant tests for path construction and partitioning.
///
/// These tests check properties over many pseudo-random inputs. Run with:
///
/// ```sh
/// cargo test -p unshape-path --features invariant-tests
/// ```
#[cfg(all(test, feature = "invariant-tests"))]
mod invariant_tests {
    use super::*;
    use crate::bezier::{cubic_point, quadratic_point};
    use crate::flatten::{flatten_cubic, flatten_quadratic};

    /// Deterministic LCG in `[0, 1)` so failures are reproducible.
    fn rand_f32(seed: &mut u32) -> f32 {
        *seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (*seed >> 8) as f32 / (1u32 << 24) as f32
    }

    fn rand_point(seed: &mut u32, scale: f32) -> Vec2 {
        Vec2::new(rand_f32(seed) * scale, rand_f32(seed) * scale)
    }

    /// Closed polygon around a circle with slightly jittered radii.
    fn random_polygon(seed: &mut u32, vertices: usize) -> Path {
        let mut path = Path::new();
        for i in 0..vertices {
            let angle = i as f32 / vertices as f32 * std::f32::consts::TAU;
            let radius = 100.0 + rand_f32(seed) * 2.0;
            let p = Vec2::new(200.0, 200.0) + Vec2::from_angle(angle) * radius;
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close();
        path
    }

    // ========================================================================
    // Bounds invariants
    // ========================================================================

    /// Every vertex lies inside the path bounds, and the bounds are tight.
    #[test]
    fn test_bounds_contain_all_vertices() {
        let mut seed = 7;
        for _ in 0..50 {
            let path = random_polygon(&mut seed, 40);
            let bounds = path.bounds().unwrap();
            for v in path.vertices() {
                assert!(bounds.contains(*v), "{v:?} outside {bounds:?}");
            }
            assert_eq!(Bounds::from_points(path.vertices().iter().copied()), Some(bounds));
        }
    }

    // ========================================================================
    // Flattening invariants
    // ========================================================================

    /// Flattened curves end exactly at their end point.
    #[test]
    fn test_flatten_endpoint_exact() {
        let mut seed = 11;
        let config = FlattenConfig::default();
        for _ in 0..100 {
            let [p0, p1, p2, p3] = std::array::from_fn(|_| rand_point(&mut seed, 200.0));
            let mut out = Vec::new();
            flatten_cubic(p0, p1, p2, p3, 0.5, &config, &mut |p| out.push(p));
            assert_eq!(out.last(), Some(&p3));

            out.clear();
            flatten_quadratic(p0, p1, p2, 0.5, &config, &mut |p| out.push(p));
            assert_eq!(out.last(), Some(&p2));
        }
    }

    /// Every emitted point lies on the curve, so vertices never leave the hull.
    #[test]
    fn test_flatten_points_on_curve() {
        let mut seed = 13;
        let config = FlattenConfig::default();
        for _ in 0..50 {
            let [p0, p1, p2, p3] = std::array::from_fn(|_| rand_point(&mut seed, 200.0));
            let mut out = Vec::new();
            flatten_cubic(p0, p1, p2, p3, 0.5, &config, &mut |p| out.push(p));

            let hull = Bounds::from_points([p0, p1, p2, p3]).unwrap();
            for p in &out {
                let grown = Bounds::new(hull.min - 1e-3, hull.max + 1e-3);
                assert!(grown.contains(*p), "{p:?} outside control hull");
            }
        }
    }

    /// Quadratic chord midpoints stay within tolerance of the curve.
    #[test]
    fn test_quadratic_flatten_fidelity() {
        let mut seed = 17;
        let tolerance = 0.5;
        let config = FlattenConfig::default().with_max_depth(12);
        for _ in 0..50 {
            let [p0, p1, p2] = std::array::from_fn(|_| rand_point(&mut seed, 100.0));
            let mut out = vec![p0];
            flatten_quadratic(p0, p1, p2, tolerance, &config, &mut |p| out.push(p));

            // Each segment's chord midpoint is within tolerance of the curve.
            for w in out.windows(2) {
                let mid = (w[0] + w[1]) * 0.5;
                let nearest = (0..=4000)
                    .map(|i| quadratic_point(p0, p1, p2, i as f32 / 4000.0).distance(mid))
                    .fold(f32::INFINITY, f32::min);
                assert!(nearest <= tolerance + 0.05, "deviation {nearest}");
            }
        }
    }

    /// Emitted vertices are samples of the curve itself.
    #[test]
    fn test_cubic_samples_on_curve() {
        let p0 = Vec2::new(0.0, 0.0);
        let p1 = Vec2::new(0.0, 100.0);
        let p2 = Vec2::new(100.0, 100.0);
        let p3 = Vec2::new(100.0, 0.0);
        let mut out = Vec::new();
        flatten_cubic(p0, p1, p2, p3, 0.5, &FlattenConfig::default(), &mut |p| out.push(p));

        for p in &out {
            let nearest = (0..=4000)
                .map(|i| cubic_point(p0, p1, p2, p3, i as f32 / 4000.0).distance(*p))
                .fold(f32::INFINITY, f32::min);
            assert!(nearest < 0.1, "{p:?} off curve by {nearest}");
        }
    }

    /// Every point of a cubic lies within tolerance of the flattened polyline,
    /// including inflected curves whose parameter midpoint sits on the chord.
    #[test]
    fn test_cubic_flatten_fidelity() {
        let tolerance = 0.5;
        let config = FlattenConfig::default().with_max_depth(10);
        for amplitude in [5.0, 20.0, 60.0, 150.0] {
            let s_curve = [
                Vec2::ZERO,
                Vec2::new(50.0, amplitude),
                Vec2::new(50.0, -amplitude),
                Vec2::new(100.0, 0.0),
            ];
            let arch = [
                Vec2::ZERO,
                Vec2::new(10.0, amplitude),
                Vec2::new(80.0, amplitude),
                Vec2::new(100.0, 0.0),
            ];
            for [p0, p1, p2, p3] in [s_curve, arch] {
                let mut out = vec![p0];
                flatten_cubic(p0, p1, p2, p3, tolerance, &config, &mut |p| out.push(p));

                for i in 0..=1000 {
                    let p = cubic_point(p0, p1, p2, p3, i as f32 / 1000.0);
                    let nearest = out
                        .windows(2)
                        .map(|w| segment_distance(p, w[0], w[1]))
                        .fold(f32::INFINITY, f32::min);
                    assert!(
                        nearest <= tolerance + 1e-3,
                        "amplitude {amplitude}: deviation {nearest} at sample {i}"
                    );
                }
            }
        }
    }

    fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
        let ab = b - a;
        let t = ((p - a).dot(ab) / ab.length_squared().max(1e-12)).clamp(0.0, 1.0);
        p.distance(a + ab * t)
    }

    // ========================================================================
    // Partition invariants
    // ========================================================================

    /// Bands respect the vertex ceiling and together cover every edge in the
    /// bands its vertical extent touches.
    #[test]
    fn test_partition_coverage() {
        let mut seed = 23;
        let mut pool = PartitionPool::default();
        let config = PartitionConfig::default();

        for count in [10, 300, 600, 1500] {
            let mut path = random_polygon(&mut seed, count);
            let edges: Vec<Edge> = path.edges().collect();
            let parts = path.partitions(&mut pool, &config);

            let total: usize = parts.iter().map(|p| p.edges().len()).sum();
            assert!(total >= edges.len());

            for part in parts {
                assert!(part.vertex_count() <= config.max_vertices);
                assert!(!part.is_truncated(), "{part}");
                let expected = edges
                    .iter()
                    .filter(|e| e.intersects_band(part.start(), part.end()))
                    .count();
                assert_eq!(part.edges().len(), expected, "{part}");
            }

            for edge in &edges {
                assert!(
                    parts.iter().any(|p| p.edges().contains(edge)),
                    "{edge:?} missing from all bands"
                );
            }
            path.recycle(&mut pool);
        }
    }
}
