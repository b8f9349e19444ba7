//! Mesh connectivity for the geodesic solver.
//!
//! Provides vertex→face, vertex→vertex (with edge lengths) and
//! face→face-across-edge lookups, plus boundary flags and vertex normals.

// Mesh indices are u32; meshes with more than 4B elements are unsupported
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, MeshTopology, Point3, Vector3};

use crate::error::{GeodesicError, GeodesicResult};

/// Connectivity of a validated triangle mesh.
///
/// Building a `MeshConnectivity` is where structural invariants are
/// checked: every face must reference three distinct, existing vertices and
/// every edge may be shared by at most two faces.
#[derive(Debug, Clone)]
pub struct MeshConnectivity {
    /// Vertex positions.
    positions: Vec<Point3<f64>>,
    /// Unit vertex normals (from the mesh, or area-weighted from faces).
    normals: Vec<Vector3<f64>>,
    /// Faces as vertex index triples.
    faces: Vec<[u32; 3]>,
    /// For each vertex, the incident faces.
    vertex_faces: Vec<Vec<u32>>,
    /// For each vertex, (neighbor index, edge length) pairs.
    neighbors: Vec<Vec<(u32, f64)>>,
    /// For each face and corner `i`, the face across the edge opposite `i`.
    face_neighbors: Vec<[Option<u32>; 3]>,
    /// Whether each vertex lies on an open boundary.
    boundary: Vec<bool>,
}

impl MeshConnectivity {
    /// Build connectivity from a mesh, validating its structure.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::EmptyMesh`] if the mesh has no vertices or faces
    /// - [`GeodesicError::FaceIndexOutOfRange`] for dangling face indices
    /// - [`GeodesicError::RepeatedVertex`] for faces using a vertex twice
    /// - [`GeodesicError::NonManifoldEdge`] for edges with more than two faces
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_geodesic::MeshConnectivity;
    /// use mesh_types::{IndexedMesh, Vertex};
    ///
    /// let mut mesh = IndexedMesh::new();
    /// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
    /// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
    /// mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
    /// mesh.vertices.push(Vertex::from_coords(1.5, 1.0, 0.0));
    /// mesh.faces.push([0, 1, 2]);
    /// mesh.faces.push([1, 3, 2]);
    ///
    /// let conn = MeshConnectivity::from_mesh(&mesh).unwrap();
    /// assert_eq!(conn.face_neighbor(0, 0), Some(1));
    /// assert!(conn.is_boundary(0));
    /// ```
    pub fn from_mesh(mesh: &IndexedMesh) -> GeodesicResult<Self> {
        if mesh.is_empty() {
            return Err(GeodesicError::EmptyMesh);
        }

        let vertex_count = mesh.vertex_count();
        for (face, &vertices) in mesh.faces.iter().enumerate() {
            if let Some(&vertex) = vertices.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(GeodesicError::FaceIndexOutOfRange {
                    face,
                    vertex,
                    vertex_count,
                });
            }
            let [a, b, c] = vertices;
            if a == b || b == c || c == a {
                return Err(GeodesicError::RepeatedVertex { face, vertices });
            }
        }

        let positions: Vec<Point3<f64>> = mesh.vertices.iter().map(|v| v.position).collect();

        // Edge (sorted) -> (face, corner opposite the edge)
        let mut edge_faces: HashMap<(u32, u32), Vec<(u32, usize)>> = HashMap::new();
        let mut vertex_faces: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        let mut neighbors: Vec<Vec<(u32, f64)>> = vec![Vec::new(); vertex_count];
        let mut normal_accum = vec![Vector3::zeros(); vertex_count];

        for (face_idx, face) in mesh.faces.iter().enumerate() {
            let face_id = face_idx as u32;
            let [p0, p1, p2] = [0, 1, 2].map(|i| positions[face[i] as usize]);
            let weighted_normal = (p1 - p0).cross(&(p2 - p0));
            let Some(edges) = mesh.opposite_edges(face_idx) else {
                continue;
            };

            for (corner, (a, b)) in edges.into_iter().enumerate() {
                let v = face[corner];
                vertex_faces[v as usize].push(face_id);
                normal_accum[v as usize] += weighted_normal;

                let key = if a < b { (a, b) } else { (b, a) };
                edge_faces.entry(key).or_default().push((face_id, corner));

                let length = (positions[b as usize] - positions[a as usize]).norm();
                Self::add_edge(&mut neighbors, a, b, length);
            }
        }

        // Report the smallest offending edge so the error is reproducible
        if let Some((&(a, b), faces)) = edge_faces
            .iter()
            .filter(|(_, faces)| faces.len() > 2)
            .min_by_key(|&(&edge, _)| edge)
        {
            return Err(GeodesicError::NonManifoldEdge {
                a,
                b,
                face_count: faces.len(),
            });
        }

        let mut face_neighbors = vec![[None; 3]; mesh.faces.len()];
        let mut boundary = vec![false; vertex_count];
        for (&(a, b), faces) in &edge_faces {
            match faces.as_slice() {
                [(f0, c0), (f1, c1)] => {
                    face_neighbors[*f0 as usize][*c0] = Some(*f1);
                    face_neighbors[*f1 as usize][*c1] = Some(*f0);
                }
                _ => {
                    boundary[a as usize] = true;
                    boundary[b as usize] = true;
                }
            }
        }

        let normals = mesh
            .vertices
            .iter()
            .zip(normal_accum)
            .map(|(vertex, accum)| {
                vertex.normal.unwrap_or_else(|| {
                    let len = accum.norm();
                    if len > f64::EPSILON {
                        accum / len
                    } else {
                        Vector3::z()
                    }
                })
            })
            .collect();

        Ok(Self {
            positions,
            normals,
            faces: mesh.faces.clone(),
            vertex_faces,
            neighbors,
            face_neighbors,
            boundary,
        })
    }

    fn add_edge(neighbors: &mut [Vec<(u32, f64)>], v0: u32, v1: u32, length: f64) {
        if !neighbors[v0 as usize].iter().any(|&(n, _)| n == v1) {
            neighbors[v0 as usize].push((v1, length));
        }
        if !neighbors[v1 as usize].iter().any(|&(n, _)| n == v0) {
            neighbors[v1 as usize].push((v0, length));
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Position of a vertex. The index must be valid.
    #[inline]
    #[must_use]
    pub fn position(&self, vertex: u32) -> Point3<f64> {
        self.positions[vertex as usize]
    }

    /// Unit normal of a vertex. The index must be valid.
    #[inline]
    #[must_use]
    pub fn normal(&self, vertex: u32) -> Vector3<f64> {
        self.normals[vertex as usize]
    }

    /// Vertex indices of a face. The index must be valid.
    #[inline]
    #[must_use]
    pub fn face(&self, face: u32) -> [u32; 3] {
        self.faces[face as usize]
    }

    /// All faces.
    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Faces incident to a vertex.
    #[inline]
    #[must_use]
    pub fn vertex_faces(&self, vertex: u32) -> &[u32] {
        self.vertex_faces
            .get(vertex as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Neighbors of a vertex as (neighbor index, edge length) pairs.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, vertex: u32) -> &[(u32, f64)] {
        self.neighbors.get(vertex as usize).map_or(&[], Vec::as_slice)
    }

    /// The face across the edge opposite `corner` of `face`, if any.
    #[inline]
    #[must_use]
    pub fn face_neighbor(&self, face: u32, corner: usize) -> Option<u32> {
        self.face_neighbors
            .get(face as usize)
            .and_then(|n| n[corner % 3])
    }

    /// The vertex of the neighboring face that is not on the shared edge
    /// opposite `corner` of `face`.
    #[must_use]
    pub fn opposite_apex(&self, face: u32, corner: usize) -> Option<u32> {
        let other = self.face_neighbor(face, corner)?;
        let [_, a, b] = rotate(self.face(face), corner);
        self.face(other).into_iter().find(|&v| v != a && v != b)
    }

    /// Whether a vertex lies on an open boundary.
    #[inline]
    #[must_use]
    pub fn is_boundary(&self, vertex: u32) -> bool {
        self.boundary.get(vertex as usize).copied().unwrap_or(false)
    }

    /// Total number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Neighbors of a vertex ordered counter-clockwise around its normal.
    ///
    /// Interior vertices yield a closed ring (the first vertex is not
    /// repeated). Boundary vertices yield the open fan starting at the
    /// boundary edge. Vertices with a non-manifold fan yield the longest
    /// chain reachable from the start.
    #[must_use]
    pub fn ordered_ring(&self, vertex: u32) -> Vec<u32> {
        let faces = self.vertex_faces(vertex);
        if faces.is_empty() {
            return Vec::new();
        }

        let mut successor: HashMap<u32, u32> = HashMap::with_capacity(faces.len());
        for &f in faces {
            let face = self.face(f);
            let Some(corner) = face.iter().position(|&v| v == vertex) else {
                continue;
            };
            let [_, a, b] = rotate(face, corner);
            successor.insert(a, b);
        }

        // An open fan starts at the vertex that is nobody's successor.
        let start = successor
            .keys()
            .copied()
            .filter(|k| !successor.values().any(|v| v == k))
            .min()
            .or_else(|| successor.keys().copied().min());
        let Some(start) = start else {
            return Vec::new();
        };

        let mut ring = vec![start];
        let mut current = start;
        while let Some(&next) = successor.get(&current) {
            if next == start || ring.len() > successor.len() {
                break;
            }
            ring.push(next);
            current = next;
        }
        ring
    }
}

/// Rotate a face so that `corner` comes first, preserving winding.
#[inline]
pub(crate) const fn rotate(face: [u32; 3], corner: usize) -> [u32; 3] {
    match corner % 3 {
        0 => face,
        1 => [face[1], face[2], face[0]],
        _ => [face[2], face[0], face[1]],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{planar_grid, Vertex};

    fn two_triangles() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, -1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 3, 1]);
        mesh
    }

    #[test]
    fn shared_edge_neighbors() {
        let conn = MeshConnectivity::from_mesh(&two_triangles()).unwrap();

        assert_eq!(conn.vertex_count(), 4);
        assert_eq!(conn.edge_count(), 5);
        // Edge (0, 1) is opposite corner 2 of face 0 and corner 1 of face 1
        assert_eq!(conn.face_neighbor(0, 2), Some(1));
        assert_eq!(conn.face_neighbor(1, 1), Some(0));
        assert_eq!(conn.face_neighbor(0, 0), None);
        assert_eq!(conn.opposite_apex(0, 2), Some(3));
        assert_eq!(conn.opposite_apex(1, 1), Some(2));
    }

    #[test]
    fn edge_lengths() {
        let conn = MeshConnectivity::from_mesh(&two_triangles()).unwrap();
        let to_one = conn.neighbors(0).iter().find(|&&(n, _)| n == 1).unwrap();
        assert_relative_eq!(to_one.1, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn computed_normals_point_up() {
        let conn = MeshConnectivity::from_mesh(&two_triangles()).unwrap();
        assert_relative_eq!(conn.normal(0).z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_dangling_index() {
        let mut mesh = two_triangles();
        mesh.faces.push([0, 1, 42]);
        let err = MeshConnectivity::from_mesh(&mesh).unwrap_err();
        assert!(matches!(
            err,
            GeodesicError::FaceIndexOutOfRange { vertex: 42, .. }
        ));
    }

    #[test]
    fn rejects_repeated_vertex() {
        let mut mesh = two_triangles();
        mesh.faces.push([2, 2, 3]);
        let err = MeshConnectivity::from_mesh(&mesh).unwrap_err();
        assert!(matches!(err, GeodesicError::RepeatedVertex { face: 2, .. }));
    }

    #[test]
    fn rejects_non_manifold_edge() {
        let mut mesh = two_triangles();
        mesh.vertices.push(Vertex::from_coords(0.5, 0.0, 1.0));
        mesh.faces.push([0, 1, 4]);
        let err = MeshConnectivity::from_mesh(&mesh).unwrap_err();
        assert!(matches!(
            err,
            GeodesicError::NonManifoldEdge { face_count: 3, .. }
        ));
    }

    #[test]
    fn non_manifold_error_names_smallest_edge() {
        let mut mesh = IndexedMesh::new();
        for k in 0..10 {
            let x = f64::from(k);
            mesh.vertices.push(Vertex::from_coords(x, x * x, f64::from(k % 3)));
        }
        // Two fans of three faces; the fan on edge (5, 6) comes first
        for apex in [7, 8, 9] {
            mesh.faces.push([5, 6, apex]);
        }
        for apex in [2, 3, 4] {
            mesh.faces.push([0, 1, apex]);
        }

        for _ in 0..8 {
            assert_eq!(
                MeshConnectivity::from_mesh(&mesh).unwrap_err(),
                GeodesicError::NonManifoldEdge {
                    a: 0,
                    b: 1,
                    face_count: 3
                }
            );
        }
    }

    #[test]
    fn rejects_empty_mesh() {
        let err = MeshConnectivity::from_mesh(&IndexedMesh::new()).unwrap_err();
        assert_eq!(err, GeodesicError::EmptyMesh);
    }

    #[test]
    fn interior_ring_is_closed_and_ccw() {
        // 2x2 grid, center vertex 4 has six neighbors
        let grid = planar_grid(2, 2, 1.0);
        let conn = MeshConnectivity::from_mesh(&grid).unwrap();
        assert!(!conn.is_boundary(4));

        let ring = conn.ordered_ring(4);
        assert_eq!(ring.len(), 6);

        let center = conn.position(4);
        let mut turning = 0.0;
        for (k, &v) in ring.iter().enumerate() {
            let w = ring[(k + 1) % ring.len()];
            let a = conn.position(v) - center;
            let b = conn.position(w) - center;
            turning += a.cross(&b).z.atan2(a.dot(&b));
        }
        assert_relative_eq!(turning, std::f64::consts::TAU, epsilon = 1e-9);
    }

    #[test]
    fn boundary_ring_is_open() {
        let grid = planar_grid(2, 2, 1.0);
        let conn = MeshConnectivity::from_mesh(&grid).unwrap();
        assert!(conn.is_boundary(1));
        // Vertex 1 (bottom middle) touches faces of two squares
        let ring = conn.ordered_ring(1);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), Some(&2));
        assert_eq!(ring.last(), Some(&0));
    }
}
