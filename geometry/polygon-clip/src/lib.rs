//! Exact convex polygon intersection.
//!
//! This crate intersects two convex planar polygons with O'Rourke's
//! edge-chasing algorithm. Coordinates are snapped to an integer lattice
//! ([`PolygonIntersector::SCALE`] steps per unit) so every orientation and
//! segment test is decided exactly:
//!
//! - [`PolygonIntersector`] - Intersector keeping its most recent result
//! - [`intersect_convex`] - One-shot convenience wrapper
//! - [`polygon_area`] / [`signed_area`] - Shoelace area
//!
//! Disjoint inputs, polygons touching at a point and polygons sharing an
//! edge from opposite sides all produce an empty result rather than an
//! error.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no rendering or GUI dependencies. The mesh
//! crates use it to weigh overlapping parameterization cells.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point2;
//! use polygon_clip::{intersect_convex, polygon_area};
//!
//! let triangle = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(0.0, 4.0),
//! ];
//! let square = [
//!     Point2::new(1.0, 1.0),
//!     Point2::new(3.0, 1.0),
//!     Point2::new(3.0, 3.0),
//!     Point2::new(1.0, 3.0),
//! ];
//!
//! let overlap = intersect_convex(&triangle, &square);
//! assert!((polygon_area(&overlap) - 2.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod area;
mod intersect;
mod predicates;

pub use area::{polygon_area, signed_area};
pub use intersect::{intersect_convex, PolygonIntersector};
