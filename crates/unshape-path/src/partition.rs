//! Vertical band partitioning of path edges.
//!
//! The fill shader tests pixel membership against a fixed-size edge array.
//! Paths with more edges than that array holds are split into horizontal
//! strips (bands along the Y axis), each small enough for one draw call.
//!
//! Splitting is a binary partition of the band at its midpoint. An edge joins
//! the lower half when either endpoint lies at or below the midpoint and the
//! upper half when either endpoint lies at or above it, so an edge straddling
//! the split appears in both halves. Every band therefore holds exactly the
//! edges whose vertical extent touches it, which is what a scanline test
//! inside the band needs.
//!
//! Bands still too large at [`PartitionConfig::max_depth`] are truncated to
//! `max_vertices / 2` edges with a warning. The fill is then approximate for
//! that band.
//!
//! # Example
//!
//! ```
//! use unshape_path::{Edge, EdgePartitioner, PartitionConfig, PartitionPool};
//! use glam::Vec2;
//!
//! let edges: Vec<Edge> = (0..400)
//!     .map(|i| Edge::new(Vec2::new(0.0, i as f32), Vec2::new(1.0, i as f32 + 1.0)))
//!     .collect();
//!
//! let mut pool = PartitionPool::default();
//! let mut partitions = Vec::new();
//! EdgePartitioner::new(PartitionConfig::default())
//!     .partition(edges, 0.0, 400.0, &mut pool, &mut partitions);
//!
//! assert_eq!(partitions.len(), 2);
//! assert!(partitions.iter().all(|p| p.vertex_count() <= 512));
//! ```

use crate::{DEFAULT_PARTITION_DEPTH, DEFAULT_POOL_CAPACITY, Edge, MAX_VERTICES};
use std::fmt;

/// Configuration for edge partitioning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartitionConfig {
    /// Vertex ceiling per partition (two vertices per edge).
    pub max_vertices: usize,
    /// Maximum split depth before bands are truncated.
    pub max_depth: u32,
    /// Number of released partitions kept for reuse.
    pub pool_capacity: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            max_vertices: MAX_VERTICES,
            max_depth: DEFAULT_PARTITION_DEPTH,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl PartitionConfig {
    /// Sets the vertex ceiling.
    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }

    /// Sets the maximum split depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the pool capacity.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Largest edge count a partition may hold.
    pub fn max_edges(&self) -> usize {
        self.max_vertices / 2
    }

    fn fits(&self, partition: &Partition) -> bool {
        partition.vertex_count() <= self.max_vertices
    }
}

/// A vertical band of a path together with the edges that touch it.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    start: f32,
    end: f32,
    edges: Vec<Edge>,
    depth: u32,
    truncated: bool,
}

impl Partition {
    /// Lower Y bound of the band.
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Upper Y bound of the band.
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Edges whose vertical extent intersects the band.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Split depth that produced this band (0 for an unsplit path).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of vertices the fill shader receives for this band.
    pub fn vertex_count(&self) -> usize {
        self.edges.len() * 2
    }

    /// True when edges were dropped at the depth cap.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Resets the partition for reuse, keeping its edge allocation.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.start = 0.0;
        self.end = 0.0;
        self.depth = 0;
        self.truncated = false;
    }

    fn band(&mut self, start: f32, end: f32, depth: u32) {
        self.start = start;
        self.end = end;
        self.depth = depth;
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Partition(start: {}, end: {}, edges: {}, depth: {})",
            self.start,
            self.end,
            self.edges.len(),
            self.depth
        )
    }
}

/// Bounded free-list of partitions.
///
/// Released partitions keep their edge buffers, so steady-state redraws stop
/// allocating. Partitions released while the pool is full are dropped.
#[derive(Debug, Clone)]
pub struct PartitionPool {
    free: Vec<Partition>,
    capacity: usize,
}

impl Default for PartitionPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl PartitionPool {
    /// Creates an empty pool holding at most `capacity` partitions.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Takes a cleared partition from the pool, or a fresh one if it is empty.
    pub fn acquire(&mut self) -> Partition {
        self.free.pop().unwrap_or_default()
    }

    /// Clears a partition and returns it to the pool.
    pub fn release(&mut self, mut partition: Partition) {
        if self.free.len() >= self.capacity {
            return;
        }
        partition.clear();
        self.free.push(partition);
    }

    /// Releases every partition drained from `partitions`.
    pub fn release_all(&mut self, partitions: &mut Vec<Partition>) {
        for partition in partitions.drain(..) {
            self.release(partition);
        }
    }

    /// Number of pooled partitions.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Returns true if no partitions are pooled.
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Maximum number of pooled partitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Pending work while splitting bands.
enum Task {
    /// A band that fits; emitted as-is.
    Emit(Partition),
    /// A band that must be split further.
    Split(Partition),
}

/// Splits edge sets into bands that fit the vertex ceiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgePartitioner {
    config: PartitionConfig,
}

impl EdgePartitioner {
    /// Creates a partitioner with the given configuration.
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Partitions `edges` spanning the band `[start, end]` into `out`.
    ///
    /// Output order is depth-first, lower half before upper half. Partitions
    /// come from `pool`; the caller owns them until it releases them.
    pub fn partition(
        &self,
        edges: impl IntoIterator<Item = Edge>,
        start: f32,
        end: f32,
        pool: &mut PartitionPool,
        out: &mut Vec<Partition>,
    ) {
        let mut root = pool.acquire();
        root.band(start, end, 0);
        root.edges.extend(edges);
        let edge_count = root.edges.len();

        if self.config.fits(&root) {
            out.push(root);
            return;
        }

        // Explicit work-list in place of recursion: the lower half is pushed
        // last so it is processed first.
        let mut pending = vec![Task::Split(root)];
        while let Some(task) = pending.pop() {
            let parent = match task {
                Task::Emit(partition) => {
                    out.push(partition);
                    continue;
                }
                Task::Split(partition) => partition,
            };

            if parent.depth >= self.config.max_depth {
                out.push(self.truncate(parent));
                continue;
            }

            let (lower, upper) = self.split(&parent, pool);
            pool.release(parent);

            pending.push(self.task_for(upper));
            pending.push(self.task_for(lower));
        }

        log::trace!(
            "partitioned {} edges into {} bands",
            edge_count,
            out.len()
        );
    }

    fn task_for(&self, partition: Partition) -> Task {
        if self.config.fits(&partition) {
            Task::Emit(partition)
        } else {
            Task::Split(partition)
        }
    }

    fn split(&self, parent: &Partition, pool: &mut PartitionPool) -> (Partition, Partition) {
        let mid = (parent.end - parent.start) / 2.0 + parent.start;

        let mut lower = pool.acquire();
        lower.band(parent.start, mid, parent.depth + 1);
        let mut upper = pool.acquire();
        upper.band(mid, parent.end, parent.depth + 1);

        for edge in &parent.edges {
            if edge.start.y <= mid || edge.end.y <= mid {
                lower.edges.push(*edge);
            }
            if edge.start.y >= mid || edge.end.y >= mid {
                upper.edges.push(*edge);
            }
        }

        (lower, upper)
    }

    fn truncate(&self, mut partition: Partition) -> Partition {
        log::warn!(
            "max partition depth {} reached with {} edges in band [{}, {}]; truncating to {}",
            self.config.max_depth,
            partition.edges.len(),
            partition.start,
            partition.end,
            self.config.max_edges()
        );
        partition.edges.truncate(self.config.max_edges());
        partition.truncated = true;
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Closed polygon on a circle, as edges.
    fn circle_edges(count: usize, radius: f32) -> Vec<Edge> {
        let point = |i: usize| {
            let angle = std::f32::consts::TAU * (i % count) as f32 / count as f32;
            Vec2::new(angle.cos(), angle.sin()) * radius
        };
        (0..count).map(|i| Edge::new(point(i), point(i + 1))).collect()
    }

    fn run(edges: &[Edge], start: f32, end: f32, config: PartitionConfig) -> Vec<Partition> {
        let mut pool = PartitionPool::new(config.pool_capacity);
        let mut out = Vec::new();
        EdgePartitioner::new(config).partition(
            edges.iter().copied(),
            start,
            end,
            &mut pool,
            &mut out,
        );
        out
    }

    #[test]
    fn test_small_edge_set_is_single_partition() {
        let edges = circle_edges(100, 50.0);
        let parts = run(&edges, -50.0, 50.0, PartitionConfig::default());

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].depth(), 0);
        assert_eq!(parts[0].edges().len(), 100);
        assert_eq!(parts[0].start(), -50.0);
        assert_eq!(parts[0].end(), 50.0);
    }

    #[test]
    fn test_exactly_at_limit_is_not_split() {
        let edges = circle_edges(256, 50.0);
        let parts = run(&edges, -50.0, 50.0, PartitionConfig::default());
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_split_respects_vertex_limit() {
        let edges = circle_edges(600, 100.0);
        let parts = run(&edges, -100.0, 100.0, PartitionConfig::default());

        assert!(parts.len() >= 2);
        for p in &parts {
            assert!(p.vertex_count() <= MAX_VERTICES, "{p}");
            assert!(!p.is_truncated());
        }
        let total: usize = parts.iter().map(|p| p.edges().len()).sum();
        assert!(total >= 600);
    }

    #[test]
    fn test_bands_are_ordered_and_contiguous() {
        let edges = circle_edges(600, 100.0);
        let parts = run(&edges, -100.0, 100.0, PartitionConfig::default());

        assert_eq!(parts[0].start(), -100.0);
        assert_eq!(parts.last().unwrap().end(), 100.0);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn test_straddling_edge_in_both_halves() {
        // 200 edges below, 200 above and one crossing the midpoint.
        let mut edges = Vec::new();
        for i in 0..200 {
            let x = i as f32;
            edges.push(Edge::new(Vec2::new(x, 0.0), Vec2::new(x + 1.0, 1.0)));
            edges.push(Edge::new(Vec2::new(x, 9.0), Vec2::new(x + 1.0, 10.0)));
        }
        let straddle = Edge::new(Vec2::new(0.0, 2.0), Vec2::new(0.0, 8.0));
        edges.push(straddle);

        let parts = run(&edges, 0.0, 10.0, PartitionConfig::default());
        assert_eq!(parts.len(), 2);
        assert!(parts[0].edges().contains(&straddle));
        assert!(parts[1].edges().contains(&straddle));
        assert_eq!(parts[0].edges().len(), 201);
        assert_eq!(parts[1].edges().len(), 201);
    }

    #[test]
    fn test_depth_cap_truncates() {
        // All edges on one scanline can never be separated.
        let edges: Vec<Edge> = (0..600)
            .map(|i| Edge::new(Vec2::new(i as f32, 5.0), Vec2::new(i as f32 + 1.0, 5.0)))
            .collect();
        let config = PartitionConfig::default().with_max_depth(2);
        let parts = run(&edges, 5.0, 5.0, config);

        assert_eq!(parts.len(), 4);
        for p in &parts {
            assert!(p.is_truncated());
            assert_eq!(p.depth(), 2);
            assert_eq!(p.edges().len(), MAX_VERTICES / 2);
        }
    }

    #[test]
    fn test_pool_reuse_clears_partition() {
        let mut pool = PartitionPool::new(2);
        assert!(pool.is_empty());

        let mut a = pool.acquire();
        a.edges.push(Edge::new(Vec2::ZERO, Vec2::ONE));
        a.band(1.0, 2.0, 3);
        pool.release(a);
        assert_eq!(pool.len(), 1);

        let reused = pool.acquire();
        assert!(reused.edges().is_empty());
        assert!(reused.edges.capacity() >= 1);
        assert_eq!(reused.depth(), 0);
        assert_eq!(reused.start(), 0.0);
        assert_eq!(reused.end(), 0.0);
    }

    #[test]
    fn test_pool_drops_beyond_capacity() {
        let mut pool = PartitionPool::new(2);
        for _ in 0..3 {
            pool.release(Partition::default());
        }
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_partitioning_returns_intermediates_to_pool() {
        let edges = circle_edges(600, 100.0);
        let config = PartitionConfig::default();
        let mut pool = PartitionPool::new(config.pool_capacity);
        let mut out = Vec::new();
        EdgePartitioner::new(config).partition(edges, -100.0, 100.0, &mut pool, &mut out);

        // Split parents go back to the pool as soon as their halves exist.
        assert!(!pool.is_empty());

        let emitted = out.len();
        pool.release_all(&mut out);
        assert!(out.is_empty());
        assert!(pool.len() >= emitted);
    }

    #[test]
    fn test_display() {
        let mut p = Partition::default();
        p.band(0.0, 4.5, 2);
        assert_eq!(p.to_string(), "Partition(start: 0, end: 4.5, edges: 0, depth: 2)");
    }
}
