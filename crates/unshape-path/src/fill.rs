//! Fill draw output.
//!
//! Each partition becomes one draw: a band-sized quad covering the path's
//! horizontal extent, plus the partition's edges packed as vertex pairs for the
//! shader's fixed-size edge array. [`is_inside`] is the CPU version of the
//! membership test the shader runs per fragment.

use crate::error::{PathError, Result};
use crate::partition::Partition;
use crate::{Bounds, Edge};
use glam::Vec2;

/// Fill rule for determining inside/outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    /// Non-zero winding rule.
    #[default]
    NonZero,
    /// Even-odd (parity) rule.
    EvenOdd,
}

/// Geometry for one fill draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct FillDraw {
    /// Bottom of the band.
    pub start: f32,
    /// Top of the band.
    pub end: f32,
    /// Two triangles covering the band.
    pub quad: [Vec2; 6],
    /// Edge endpoints; edge `i` occupies `2 * i` and `2 * i + 1`.
    pub vertices: Vec<Vec2>,
}

impl FillDraw {
    /// Number of packed edge vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Iterates the packed edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices
            .chunks_exact(2)
            .map(|pair| Edge::new(pair[0], pair[1]))
    }
}

/// Builds one [`FillDraw`] per partition.
///
/// # Errors
///
/// Returns [`PathError::PartitionOverflow`] if any partition packs to more
/// than `max_vertices` vertices. The partitioner truncates bands at its depth
/// cap, so this only happens when the partition and draw ceilings disagree.
pub fn fill_draws(
    bounds: Bounds,
    partitions: &[Partition],
    max_vertices: usize,
) -> Result<Vec<FillDraw>> {
    partitions
        .iter()
        .map(|partition| {
            let edges = partition.edges();
            if edges.len() * 2 > max_vertices {
                return Err(PathError::PartitionOverflow {
                    edges: edges.len(),
                    max_vertices,
                });
            }

            let (start, end) = (partition.start(), partition.end());
            Ok(FillDraw {
                start,
                end,
                quad: band_quad(bounds.min.x, bounds.max.x, start, end),
                vertices: edges.iter().flat_map(|e| [e.start, e.end]).collect(),
            })
        })
        .collect()
}

fn band_quad(left: f32, right: f32, start: f32, end: f32) -> [Vec2; 6] {
    let a = Vec2::new(left, start);
    let b = Vec2::new(right, start);
    let c = Vec2::new(right, end);
    let d = Vec2::new(left, end);
    [a, b, c, a, c, d]
}

/// Tests whether `point` is inside the shape bounded by `edges`.
///
/// A horizontal ray is cast towards +x. Edges are half-open in y so a ray
/// through a shared vertex counts one crossing.
pub fn is_inside(edges: &[Edge], point: Vec2, rule: FillRule) -> bool {
    let mut winding = 0i32;
    let mut crossings = 0u32;

    for edge in edges {
        let (top, bottom, direction) = if edge.start.y <= edge.end.y {
            (edge.start, edge.end, 1)
        } else {
            (edge.end, edge.start, -1)
        };

        if point.y < top.y || point.y >= bottom.y {
            continue;
        }

        let t = (point.y - top.y) / (bottom.y - top.y);
        let x = top.x + t * (bottom.x - top.x);
        if x > point.x {
            winding += direction;
            crossings += 1;
        }
    }

    match rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => crossings % 2 == 1,
    }
}
