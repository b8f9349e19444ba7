//! Read-only mesh access.

use crate::{Triangle, Vertex};

/// Indexed triangle mesh as seen by the distance solvers.
///
/// Corner `k` of a face is opposite the edge joining corners `k + 1` and
/// `k + 2` (mod 3). Neighbour faces, unfolded apexes and interpolation
/// stencils are all keyed by that corner.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangles.
    fn face_count(&self) -> usize;

    /// True when there is nothing to march over.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex by index, `None` if out of bounds.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Vertex indices of a face, `None` if out of bounds.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Face with resolved positions.
    ///
    /// Returns `None` if the face or one of its vertices is out of bounds.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// The three edges of a face, edge `k` opposite corner `k`.
    fn opposite_edges(&self, face_index: usize) -> Option<[(u32, u32); 3]> {
        let [a, b, c] = self.face(face_index)?;
        Some([(b, c), (c, a), (a, b)])
    }
}
