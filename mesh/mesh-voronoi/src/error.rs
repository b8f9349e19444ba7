//! Error types for Voronoi diagrams and geometry atlases.

use mesh_geodesic::GeodesicError;
use thiserror::Error;

/// Result type for Voronoi operations.
pub type VoronoiResult<T> = Result<T, VoronoiError>;

/// Errors that can occur while building or querying a Voronoi diagram or
/// geometry atlas.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VoronoiError {
    /// Error from the underlying geodesic solver.
    #[error(transparent)]
    Geodesic(#[from] GeodesicError),

    /// No vertex has been reached by any front.
    #[error("no vertex has a front; march from at least one source first")]
    NotMarched,

    /// A vertex carries a front the diagram has no cell for.
    #[error("front {front} has no Voronoi cell (diagram built from a different march?)")]
    UnknownFront {
        /// The front (source vertex index).
        front: u32,
    },

    /// Too few samples per cell edge.
    #[error("samples per cell edge must be at least 3, got {samples}")]
    InvalidSampleCount {
        /// Requested samples per edge.
        samples: usize,
    },

    /// Invalid cell group index.
    #[error("invalid cell group index: {index} (atlas has {group_count} groups)")]
    InvalidGroup {
        /// The invalid index.
        index: usize,
        /// Number of groups in the atlas.
        group_count: usize,
    },

    /// Invalid cell index within a group.
    #[error("invalid cell index: {index} (group {group} has {cell_count} cells)")]
    InvalidCell {
        /// Group index.
        group: usize,
        /// The invalid index.
        index: usize,
        /// Number of cells in the group.
        cell_count: usize,
    },

    /// Cell coordinates outside the unit square.
    #[error("cell coordinates ({u}, {v}) outside [0, 1]²")]
    InvalidCoordinates {
        /// First coordinate.
        u: f64,
        /// Second coordinate.
        v: f64,
    },
}
