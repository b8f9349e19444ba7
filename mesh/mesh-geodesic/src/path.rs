//! Discrete geodesic paths back to a source.

use crate::error::{GeodesicError, GeodesicResult};
use crate::marching::GeodesicMesh;

/// A vertex path from a reached vertex down to its source.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesicPath {
    /// Visited vertices, starting at the query vertex and ending at a source.
    pub vertices: Vec<u32>,
    /// Sum of the Euclidean edge lengths along the path.
    pub length: f64,
}

impl GeodesicPath {
    /// The source the path ends at.
    #[must_use]
    pub fn source(&self) -> Option<u32> {
        self.vertices.last().copied()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

impl GeodesicMesh {
    /// Walk from `vertex` to its source by steepest descent over the
    /// vertex graph: each step moves to the neighbor with the smallest
    /// distance, which must be strictly smaller than the current one.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidVertex`] for an out-of-range index
    /// - [`GeodesicError::UnreachedVertex`] if no front reached `vertex`
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_geodesic::{FastMarchingParams, GeodesicMesh};
    /// use mesh_types::planar_grid;
    ///
    /// let mut geo = GeodesicMesh::new(&planar_grid(3, 1, 1.0)).unwrap();
    /// geo.march(&[0], &FastMarchingParams::default()).unwrap();
    ///
    /// let path = geo.backtrack(3).unwrap();
    /// assert_eq!(path.vertices, vec![3, 2, 1, 0]);
    /// assert!((path.length - 3.0).abs() < 1e-12);
    /// ```
    pub fn backtrack(&self, vertex: u32) -> GeodesicResult<GeodesicPath> {
        let state = self.vertex(vertex)?;
        if !state.is_reached() {
            return Err(GeodesicError::UnreachedVertex { vertex });
        }

        let conn = self.connectivity();
        let mut vertices = vec![vertex];
        let mut length = 0.0;
        let mut current = vertex;

        while vertices.len() <= self.vertex_count() {
            let d = self.distance(current);
            if d <= 0.0 || self.front(current) == Some(current) {
                break;
            }

            let next = conn
                .neighbors(current)
                .iter()
                .filter(|(n, _)| self.distance(*n) < d)
                .min_by(|(a, _), (b, _)| {
                    self.distance(*a)
                        .total_cmp(&self.distance(*b))
                        .then_with(|| a.cmp(b))
                });
            let Some(&(next, edge)) = next else {
                break;
            };

            vertices.push(next);
            length += edge;
            current = next;
        }

        Ok(GeodesicPath { vertices, length })
    }
}
