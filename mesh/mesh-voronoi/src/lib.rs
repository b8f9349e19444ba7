//! Geodesic Voronoi diagrams and parameterization atlases.
//!
//! Built on the fronts of a [`mesh_geodesic`] march, this crate provides:
//!
//! - [`VoronoiMesh`] - One cell per source, boundary edges between cells,
//!   trissector junctions where three cells meet, and the dual triangle mesh
//! - **Cell parameters** - Per-vertex `(cell, weight)` slots from the own
//!   and overlapping fronts ([`VoronoiMesh::assign_parameters`])
//! - [`GeometryAtlas`] - Each cell with at least three junctions is split
//!   into quadrilateral [`GeometryCell`]s, sampled on an `n×n` grid and
//!   smoothed across cell borders
//!
//! Cell overlap is measured with the exact convex intersector from
//! [`polygon_clip`].
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no rendering or GUI dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_geodesic::{FastMarchingParams, GeodesicMesh};
//! use mesh_types::icosphere;
//! use mesh_voronoi::{AtlasParams, GeometryAtlas, VoronoiMesh};
//!
//! let mut geo = GeodesicMesh::new(&icosphere(2)).unwrap();
//! let seeds = geo.farthest_point_seeds(0, 6, &FastMarchingParams::default()).unwrap();
//!
//! let diagram = VoronoiMesh::from_geodesic(&geo).unwrap();
//! assert_eq!(diagram.vertex_count(), seeds.len());
//! diagram.assign_parameters(&mut geo).unwrap();
//!
//! let mut atlas = GeometryAtlas::init_sampling(&diagram, &AtlasParams::default()).unwrap();
//! atlas.smooth_sampling();
//! let patches = atlas.to_mesh();
//! assert_eq!(patches.vertices.len(), atlas.cell_count() * 81);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod atlas;
mod cell;
mod diagram;
mod error;
mod params;

pub use atlas::{CellGroup, GeometryAtlas};
pub use cell::GeometryCell;
pub use diagram::{Trissector, VoronoiMesh, VoronoiVertex};
pub use error::{VoronoiError, VoronoiResult};
pub use params::AtlasParams;
