//! Per-frame drawing context.

use crate::fill::{FillDraw, fill_draws};
use crate::flatten::{FlattenConfig, approximate_cubic_bspline};
use crate::partition::{PartitionConfig, PartitionPool};
use crate::state::{RenderState, StateStack};
use crate::stroke::{StrokeGeometry, fan_triangles, stroke_polyline};
use crate::{Path, Result};
use glam::Vec2;
use std::ops::{Deref, DerefMut};

/// Owns the style stack and the partition pool used while drawing.
///
/// A context is single-threaded and meant to live across frames, so pooled
/// partitions are reused by every path filled through it.
///
/// # Example
///
/// ```
/// use unshape_path::RenderContext;
/// use glam::Vec2;
///
/// let mut ctx = RenderContext::new();
/// {
///     let mut scope = ctx.push_state();
///     scope.state_mut().stroke_weight = 4.0;
///     assert_eq!(scope.state().stroke_weight, 4.0);
/// }
/// assert_eq!(ctx.state().stroke_weight, 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    states: StateStack,
    pool: PartitionPool,
    flatten: FlattenConfig,
    partition: PartitionConfig,
}

impl RenderContext {
    /// Creates a context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with custom flattening and partitioning settings.
    pub fn with_configs(flatten: FlattenConfig, partition: PartitionConfig) -> Self {
        Self {
            states: StateStack::default(),
            pool: PartitionPool::new(partition.pool_capacity),
            flatten,
            partition,
        }
    }

    /// Returns a snapshot of the active style.
    pub fn state(&self) -> RenderState {
        *self.states.current()
    }

    /// Returns the active style for modification.
    pub fn state_mut(&mut self) -> &mut RenderState {
        self.states.current_mut()
    }

    /// Pushes a default style frame, popped when the returned scope drops.
    pub fn push_state(&mut self) -> StateScope<'_> {
        self.states.push();
        StateScope { ctx: self }
    }

    /// Returns the style stack.
    pub fn states(&self) -> &StateStack {
        &self.states
    }

    /// Returns the partition pool.
    pub fn pool(&self) -> &PartitionPool {
        &self.pool
    }

    pub fn flatten_config(&self) -> &FlattenConfig {
        &self.flatten
    }

    pub fn partition_config(&self) -> &PartitionConfig {
        &self.partition
    }

    /// Creates an empty path using this context's flattening settings.
    pub fn new_path(&self) -> Path {
        Path::with_flatten_config(self.flatten)
    }

    /// Produces the fill draws for `path`.
    ///
    /// Paths with fewer than three vertices log a warning and draw nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::PartitionOverflow`](crate::PathError::PartitionOverflow)
    /// if a partition exceeds the vertex ceiling.
    pub fn fill(&mut self, path: &mut Path) -> Result<Vec<FillDraw>> {
        let Some(bounds) = path.bounds().filter(|_| path.vertex_count() >= 3) else {
            log::warn!(
                "fill needs at least 3 points, got {}",
                path.vertex_count()
            );
            return Ok(Vec::new());
        };

        let partitions = path.partitions(&mut self.pool, &self.partition);
        log::debug!("filling path with {} partitions", partitions.len());
        fill_draws(bounds, partitions, self.partition.max_vertices)
    }

    /// Fills a convex polygon as a triangle fan.
    pub fn fill_convex(&self, vertices: &[Vec2]) -> Vec<Vec2> {
        fan_triangles(vertices)
    }

    /// Strokes `path` with the active stroke weight.
    pub fn stroke(&self, path: &Path, closed: bool) -> StrokeGeometry {
        self.polyline(path.vertices(), path.vertex_count(), closed)
    }

    /// Strokes the first `count` vertices with the active stroke weight.
    pub fn polyline(&self, vertices: &[Vec2], count: usize, closed: bool) -> StrokeGeometry {
        stroke_polyline(vertices, count, self.states.current().stroke_weight, closed)
    }

    /// Samples a uniform cubic B-spline.
    ///
    /// Fewer than four control points logs a warning and returns no points.
    pub fn bspline(&self, control_points: &[Vec2], segments: usize) -> Vec<Vec2> {
        approximate_cubic_bspline(control_points, segments).unwrap_or_else(|err| {
            log::warn!("B-spline skipped: {err}");
            Vec::new()
        })
    }

    /// Returns the partitions cached on `path` to the pool.
    pub fn recycle(&mut self, path: &mut Path) {
        path.recycle(&mut self.pool);
    }

    /// Empties `path` for reuse, returning its partitions to the pool.
    pub fn clear_path(&mut self, path: &mut Path) {
        path.clear(&mut self.pool);
    }

    /// Drops `path` after returning its partitions to the pool.
    pub fn release_path(&mut self, mut path: Path) {
        path.recycle(&mut self.pool);
    }
}

/// Scope guard returned by [`RenderContext::push_state`].
///
/// Dereferences to the context; the pushed style frame is popped on drop.
pub struct StateScope<'a> {
    ctx: &'a mut RenderContext,
}

impl Deref for StateScope<'_> {
    type Target = RenderContext;

    fn deref(&self) -> &RenderContext {
        self.ctx
    }
}

impl DerefMut for StateScope<'_> {
    fn deref_mut(&mut self) -> &mut RenderContext {
        self.ctx
    }
}

impl Drop for StateScope<'_> {
    fn drop(&mut self) {
        self.ctx.states.pop();
    }
}
