//! Farthest point seeding.

use tracing::{debug, info, warn};

use crate::error::GeodesicResult;
use crate::marching::GeodesicMesh;
use crate::params::FastMarchingParams;

impl GeodesicMesh {
    /// Pick `count` well-spread source vertices.
    ///
    /// Starting from `first`, repeatedly marches from the current seeds and
    /// adds the reached vertex with the largest distance (ties go to the
    /// smaller index). Stops early when every reached vertex is already a
    /// seed. On return the mesh holds the march from the final seed set.
    ///
    /// # Errors
    ///
    /// Any error from [`march`](Self::march).
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_geodesic::{FastMarchingParams, GeodesicMesh};
    /// use mesh_types::planar_grid;
    ///
    /// let mut geo = GeodesicMesh::new(&planar_grid(4, 4, 1.0)).unwrap();
    /// let seeds = geo.farthest_point_seeds(0, 2, &FastMarchingParams::default()).unwrap();
    /// assert_eq!(seeds, vec![0, 24]);
    /// ```
    pub fn farthest_point_seeds(
        &mut self,
        first: u32,
        count: usize,
        params: &FastMarchingParams,
    ) -> GeodesicResult<Vec<u32>> {
        let mut seeds = vec![first];
        self.march(&seeds, params)?;

        while seeds.len() < count {
            let Some((next, distance)) = self
                .distance_field()
                .farthest_vertex()
                .filter(|&(_, d)| d > 0.0)
            else {
                warn!(
                    requested = count,
                    placed = seeds.len(),
                    "no vertex left to seed"
                );
                break;
            };

            debug!(seed = next, distance, "adding farthest seed");
            seeds.push(next);
            self.march(&seeds, params)?;
        }

        info!(seeds = seeds.len(), "Farthest point seeding complete");
        Ok(seeds)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{FastMarchingParams, GeodesicMesh};
    use mesh_types::planar_grid;

    #[test]
    fn seeds_spread_over_grid() {
        let mut geo = GeodesicMesh::new(&planar_grid(6, 6, 1.0)).unwrap();
        let seeds = geo
            .farthest_point_seeds(0, 4, &FastMarchingParams::default())
            .unwrap();

        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[0], 0);
        // Opposite corner is the farthest from vertex 0
        assert_eq!(seeds[1], 48);

        let mut unique = seeds.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 4);

        // State reflects the final seed set
        for &s in &seeds {
            assert_eq!(geo.front(s), Some(s));
        }
    }

    #[test]
    fn stops_when_every_vertex_is_a_seed() {
        let mut mesh = mesh_types::IndexedMesh::new();
        mesh.vertices.push(mesh_types::Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(mesh_types::Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(mesh_types::Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);

        let mut geo = GeodesicMesh::new(&mesh).unwrap();
        let seeds = geo
            .farthest_point_seeds(0, 10, &FastMarchingParams::default())
            .unwrap();
        assert_eq!(seeds.len(), 3);
    }
}
