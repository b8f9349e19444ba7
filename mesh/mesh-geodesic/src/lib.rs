//! Geodesic (surface) distance computation for triangle meshes.
//!
//! This crate solves the eikonal equation `|∇T| = F` on a triangulated
//! surface with a narrow-band fast marching method:
//!
//! - **Fast marching** - [`GeodesicMesh::march`] propagates fronts from one
//!   or more sources, recording per vertex the distance, the source whose
//!   front arrived first and up to two overlapping fronts
//! - **Interpolation** - [`TriangularInterpolation`] models the distance
//!   inside a face (linear, quadratic or cubic) for value and gradient
//!   queries, cached per face
//! - **Paths and seeding** - steepest-descent backtracking to the source and
//!   farthest point seeding
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no rendering or GUI dependencies. It can be
//! used from CLI tools, servers or bindings.
//!
//! # Algorithm
//!
//! Vertices are finalized in order of increasing distance. A vertex
//! adjacent to a finalized one gets a one-point update along the edge, and
//! a two-point update (planar wavefront through two finalized vertices of
//! the same face) when the solution is causal. On flat regions this is
//! exact for plane waves; in general it is a first-order approximation of
//! the true geodesic distance, always bounded by the edge-graph distance.
//!
//! # Example
//!
//! ```
//! use mesh_geodesic::{FastMarchingParams, GeodesicMesh, InterpolationKind};
//! use mesh_types::planar_grid;
//!
//! let mut geo = GeodesicMesh::new(&planar_grid(8, 8, 1.0)).unwrap();
//! let params = FastMarchingParams::default().with_interpolation(InterpolationKind::Quadratic);
//! let report = geo.march(&[0, 80], &params).unwrap();
//!
//! assert!(report.is_complete());
//! assert_eq!(geo.front(1), Some(0));
//! assert_eq!(geo.front(79), Some(80));
//!
//! let value = geo.value_at(0, 0.25, 0.25).unwrap();
//! assert!(value > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod connectivity;
mod distance;
mod error;
mod gradient;
mod interpolation;
mod marching;
mod params;
mod path;
mod report;
mod seeding;
mod update;
mod vertex;

pub use connectivity::MeshConnectivity;
pub use distance::DistanceField;
pub use error::{GeodesicError, GeodesicResult};
pub use interpolation::{
    fit_quadratic_2d, CubicInterpolation, FaceStencil, LinearInterpolation,
    QuadraticInterpolation, TriangularInterpolation,
};
pub use marching::GeodesicMesh;
pub use params::{CancelToken, FastMarchingParams, InterpolationKind};
pub use path::GeodesicPath;
pub use report::{MarchReport, Termination};
pub use vertex::{FrontOverlap, GeodesicVertex, VertexState, VoronoiSlot};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{IndexedMesh, Vertex};

    fn create_strip_mesh() -> IndexedMesh {
        // 0 -- 1 -- 2 with apex 3 above the middle
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(2.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 3]);
        mesh.faces.push([1, 2, 3]);
        mesh
    }

    #[test]
    fn basic_geodesic() {
        let mut geo = GeodesicMesh::new(&create_strip_mesh()).unwrap();
        geo.march(&[0], &FastMarchingParams::default()).unwrap();

        assert!(geo.distance(0) < 1e-10);
        assert_relative_eq!(geo.distance(1), 1.0, epsilon = 1e-10);
        assert_relative_eq!(geo.distance(2), 2.0, epsilon = 1e-10);
        assert_relative_eq!(geo.distance(3), std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn multi_source_geodesic() {
        let mut geo = GeodesicMesh::new(&create_strip_mesh()).unwrap();
        geo.march(&[0, 2], &FastMarchingParams::default()).unwrap();

        assert_relative_eq!(geo.distance(1), 1.0, epsilon = 1e-10);
        assert!(geo.distance(0) < 1e-10);
        assert!(geo.distance(2) < 1e-10);
        // Tie at vertex 1 goes to the front that got there first
        assert_eq!(geo.front(1), Some(0));
        assert!(geo.vertex(1).unwrap().front_overlap().is_overlap());
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let err = GeodesicMesh::new(&IndexedMesh::new()).unwrap_err();
        assert_eq!(err, GeodesicError::EmptyMesh);
    }
}
