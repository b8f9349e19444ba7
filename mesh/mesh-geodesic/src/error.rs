//! Error types for geodesic distance computation.

use thiserror::Error;

/// Result type for geodesic operations.
pub type GeodesicResult<T> = Result<T, GeodesicError>;

/// Errors that can occur during geodesic computation.
///
/// Structural problems with the input mesh are reported when the
/// [`GeodesicMesh`](crate::GeodesicMesh) is built. Numerical edge cases
/// inside a triangle are absorbed by the interpolation models and only
/// surface as [`GeodesicError::DegenerateGeometry`] from the linear gradient.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeodesicError {
    /// Mesh has no vertices or no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Invalid vertex index.
    #[error("invalid vertex index: {index} (mesh has {vertex_count} vertices)")]
    InvalidVertex {
        /// The invalid index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Invalid face index.
    #[error("invalid face index: {index} (mesh has {face_count} faces)")]
    InvalidFace {
        /// The invalid index.
        index: u32,
        /// Total number of faces in the mesh.
        face_count: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {vertex}, but mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Face index.
        face: usize,
        /// Offending vertex index.
        vertex: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A face uses the same vertex more than once.
    #[error("face {face} repeats a vertex: {vertices:?}")]
    RepeatedVertex {
        /// Face index.
        face: usize,
        /// The face's vertex indices.
        vertices: [u32; 3],
    },

    /// An edge is shared by more than two faces.
    #[error("edge ({a}, {b}) is shared by {face_count} faces")]
    NonManifoldEdge {
        /// First edge vertex.
        a: u32,
        /// Second edge vertex.
        b: u32,
        /// Number of faces sharing the edge.
        face_count: usize,
    },

    /// No usable source vertex was given.
    #[error("no source vertices given")]
    NoSources,

    /// Per-vertex weight array does not match the mesh.
    #[error("expected {expected} weights, got {actual}")]
    WeightCountMismatch {
        /// Number of mesh vertices.
        expected: usize,
        /// Number of weights supplied.
        actual: usize,
    },

    /// A per-vertex weight is not strictly positive and finite.
    #[error("invalid weight {weight} at vertex {vertex} (must be positive and finite)")]
    InvalidWeight {
        /// Vertex index.
        vertex: u32,
        /// Offending weight.
        weight: f64,
    },

    /// A vertex was never reached by any front.
    #[error("vertex {vertex} was not reached by any front")]
    UnreachedVertex {
        /// Vertex index.
        vertex: u32,
    },

    /// The local basis of a face is singular.
    #[error("degenerate local basis (determinant {determinant:e}, face {face:?})")]
    DegenerateGeometry {
        /// Face index, when known.
        face: Option<u32>,
        /// Determinant that failed the tolerance check.
        determinant: f64,
    },

    /// More than three Voronoi parameter slots were supplied for a vertex.
    #[error("vertex {vertex} can hold at most 3 Voronoi parameters, got {count}")]
    TooManyParameters {
        /// Vertex index.
        vertex: u32,
        /// Number of slots supplied.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GeodesicError::InvalidVertex {
            index: 12,
            vertex_count: 4,
        };
        assert_eq!(
            format!("{err}"),
            "invalid vertex index: 12 (mesh has 4 vertices)"
        );

        let err = GeodesicError::UnreachedVertex { vertex: 7 };
        assert!(format!("{err}").contains("vertex 7"));

        let err = GeodesicError::DegenerateGeometry {
            face: Some(3),
            determinant: 0.0,
        };
        assert!(format!("{err}").contains("face Some(3)"));
    }
}
