//! Core mesh types shared by the geodesic and Voronoi crates.
//!
//! This crate provides the geometric primitives the solvers operate on:
//!
//! - [`Vertex`] - A point in 3D space with an optional unit normal
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`MeshTopology`] - Minimal read-only mesh interface
//! - [`planar_grid`] / [`icosphere`] - Procedural meshes for tests and benchmarks
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no rendering or GUI dependencies. The
//! application layer supplies meshes and consumes the scalar fields and
//! atlases computed on top of them.
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Winding
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology, Point3, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod mesh;
mod primitives;
mod traits;
mod triangle;
mod vertex;

pub use mesh::IndexedMesh;
pub use primitives::{icosphere, planar_grid};
pub use traits::MeshTopology;
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};
