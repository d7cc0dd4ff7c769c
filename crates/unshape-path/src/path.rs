//! Flattened 2D path with a cached fill partition.

use crate::flatten::{FlattenConfig, flatten_cubic, flatten_quadratic, tangent_arc};
use crate::partition::{EdgePartitioner, Partition, PartitionConfig, PartitionPool};
use crate::state::RenderState;
use crate::{Bounds, Edge};
use glam::Vec2;

/// A single flattened path.
///
/// Curves are flattened as they are added, so the path is always an ordered
/// polyline. Bounds grow with every vertex; the fill partition is computed on
/// first request and reused until the path changes.
///
/// Only one subpath is supported: [`Path::move_to`] starts over.
///
/// # Example
///
/// ```
/// use unshape_path::Path;
/// use glam::Vec2;
///
/// let mut path = Path::from_start(Vec2::new(30.0, 20.0));
/// path.line_to(Vec2::new(75.0, 20.0));
/// path.line_to(Vec2::new(75.0, 75.0));
/// path.close();
///
/// assert_eq!(path.vertex_count(), 4);
/// assert_eq!(path.edge_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Path {
    vertices: Vec<Vec2>,
    bounds: Option<Bounds>,
    flatten: FlattenConfig,
    partitions: Vec<Partition>,
    partitions_valid: bool,
    partitioned_with: PartitionConfig,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path with a single start vertex.
    pub fn from_start(start: Vec2) -> Self {
        let mut path = Self::new();
        path.push_point(start);
        path
    }

    /// Creates an empty path with custom flattening settings.
    pub fn with_flatten_config(config: FlattenConfig) -> Self {
        Self {
            flatten: config,
            ..Self::default()
        }
    }

    /// Returns the flattening settings.
    pub fn flatten_config(&self) -> &FlattenConfig {
        &self.flatten
    }

    /// Clears the path and sets a new start vertex.
    ///
    /// Cached partitions go stale and are handed back to a pool by the next
    /// [`Path::partitions`] or [`Path::recycle`] call.
    pub fn move_to(&mut self, position: Vec2) {
        self.reset();
        self.push_point(position);
    }

    /// Adds a vertex connected to the previous one by a straight line.
    pub fn line_to(&mut self, position: Vec2) {
        self.push_point(position);
    }

    /// Adds a cubic Bezier curve from the last vertex to `position`.
    ///
    /// The curve is flattened with the state's curve precision.
    pub fn bezier_curve_to(
        &mut self,
        control1: Vec2,
        control2: Vec2,
        position: Vec2,
        state: &RenderState,
    ) {
        let Some(start) = self.last_point() else {
            log::warn!("Path::bezier_curve_to called on an empty path");
            return;
        };
        let config = self.flatten;
        flatten_cubic(
            start,
            control1,
            control2,
            position,
            state.curve_precision,
            &config,
            &mut |p| self.push_point(p),
        );
    }

    /// Adds a quadratic Bezier curve from the last vertex to `position`.
    ///
    /// The curve is flattened with the state's curve precision.
    pub fn quadratic_curve_to(&mut self, control: Vec2, position: Vec2, state: &RenderState) {
        let Some(start) = self.last_point() else {
            log::warn!("Path::quadratic_curve_to called on an empty path");
            return;
        };
        let config = self.flatten;
        flatten_quadratic(
            start,
            control,
            position,
            state.curve_precision,
            &config,
            &mut |p| self.push_point(p),
        );
    }

    /// Adds a circular arc tangent to the lines last vertex → `tangent1` and
    /// `tangent1` → `tangent2`.
    ///
    /// The sign of `radius` picks the side of the circle; see
    /// [`tangent_arc`](crate::flatten::tangent_arc). Parallel tangents leave
    /// the path unchanged.
    pub fn arc_to(&mut self, tangent1: Vec2, tangent2: Vec2, radius: f32) {
        let Some(start) = self.last_point() else {
            log::warn!("Path::arc_to called on an empty path");
            return;
        };
        match tangent_arc(start, tangent1, tangent2, radius, self.flatten.arc_segments) {
            Ok(points) => self.extend(points),
            Err(err) => log::warn!("Path::arc_to ignored: {err}"),
        }
    }

    /// Connects the last vertex back to the first one.
    ///
    /// Nothing is added when the two already coincide. Paths with fewer than
    /// two vertices are left unchanged.
    pub fn close(&mut self) {
        if self.vertices.len() < 2 {
            log::warn!(
                "Path::close called on a path with {} vertices",
                self.vertices.len()
            );
            return;
        }
        let first = self.vertices[0];
        if self.vertices.last() != Some(&first) {
            self.push_point(first);
        }
    }

    /// Removes all vertices and returns cached partitions to `pool`.
    pub fn clear(&mut self, pool: &mut PartitionPool) {
        self.recycle(pool);
        self.reset();
    }

    /// Returns the vertices in insertion order.
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Returns an owned copy of the vertices, for stroking.
    pub fn export_points(&self) -> Vec<Vec2> {
        self.vertices.clone()
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the path has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the last vertex, if any.
    pub fn last_point(&self) -> Option<Vec2> {
        self.vertices.last().copied()
    }

    /// Returns the bounding box, or `None` for an empty path.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Iterates the edges between consecutive vertices.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices.windows(2).map(|w| Edge::new(w[0], w[1]))
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Returns the fill partitions, computing them if the path or `config`
    /// changed since the last call.
    ///
    /// Stale partitions are released to `pool` before recomputing.
    pub fn partitions(
        &mut self,
        pool: &mut PartitionPool,
        config: &PartitionConfig,
    ) -> &[Partition] {
        if !self.partitions_valid || self.partitioned_with != *config {
            pool.release_all(&mut self.partitions);
            if let Some(bounds) = self.bounds {
                let edges = self.vertices.windows(2).map(|w| Edge::new(w[0], w[1]));
                EdgePartitioner::new(*config).partition(
                    edges,
                    bounds.min.y,
                    bounds.max.y,
                    pool,
                    &mut self.partitions,
                );
            }
            self.partitions_valid = true;
            self.partitioned_with = *config;
        }
        &self.partitions
    }

    /// Returns cached partitions to `pool` and marks them stale.
    pub fn recycle(&mut self, pool: &mut PartitionPool) {
        pool.release_all(&mut self.partitions);
        self.partitions_valid = false;
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.bounds = None;
        self.partitions_valid = false;
    }

    fn extend(&mut self, points: impl IntoIterator<Item = Vec2>) {
        for p in points {
            self.push_point(p);
        }
    }

    fn push_point(&mut self, point: Vec2) {
        self.vertices.push(point);
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.including(point),
            None => Bounds::from_point(point),
        });
        self.partitions_valid = false;
    }
}
