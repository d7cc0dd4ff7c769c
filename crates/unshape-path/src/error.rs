//! Error types for path geometry.

use thiserror::Error;

/// Errors produced by path flattening and fill output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// The primitive needs more input points than were supplied.
    #[error("not enough points: need at least {required}, got {got}")]
    NotEnoughPoints {
        /// Minimum number of points for the primitive.
        required: usize,
        /// Number of points supplied.
        got: usize,
    },

    /// The tangent lines of an arc are parallel or degenerate.
    #[error("arc tangents are parallel or zero-length")]
    DegenerateArc,

    /// A partition holds more edges than the fill shader can accept.
    #[error("partition has {edges} edges, exceeding the {max_vertices} vertex limit")]
    PartitionOverflow {
        /// Edge count of the offending partition.
        edges: usize,
        /// Vertex ceiling shared with the fill shader.
        max_vertices: usize,
    },
}

/// Result alias for path operations.
pub type Result<T> = std::result::Result<T, PathError>;
