//! Procedural meshes used by tests, benchmarks and demos.

// Grid dimensions are small and indices fit in u32
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

use crate::{IndexedMesh, Vertex};

/// Create a flat grid of `cols × rows` squares in the `z = 0` plane.
///
/// Vertex `(i, j)` sits at `(i * spacing, j * spacing, 0)` and has index
/// `j * (cols + 1) + i`. Each square is split along its `(i, j)–(i+1, j+1)`
/// diagonal. All normals point along `+Z`.
///
/// # Example
///
/// ```
/// use mesh_types::{planar_grid, MeshTopology};
///
/// let grid = planar_grid(4, 3, 0.5);
/// assert_eq!(grid.vertex_count(), 20);
/// assert_eq!(grid.face_count(), 24);
/// ```
#[must_use]
pub fn planar_grid(cols: usize, rows: usize, spacing: f64) -> IndexedMesh {
    let mut mesh = IndexedMesh::with_capacity((cols + 1) * (rows + 1), 2 * cols * rows);
    let stride = cols + 1;

    for j in 0..=rows {
        for i in 0..=cols {
            mesh.vertices.push(Vertex::with_normal(
                Point3::new(i as f64 * spacing, j as f64 * spacing, 0.0),
                Vector3::z(),
            ));
        }
    }

    for j in 0..rows {
        for i in 0..cols {
            let a = (j * stride + i) as u32;
            let b = a + 1;
            let c = a + 1 + stride as u32;
            let d = a + stride as u32;
            mesh.faces.push([a, b, c]);
            mesh.faces.push([a, c, d]);
        }
    }

    mesh
}

/// Create a unit-radius icosphere.
///
/// Starts from a regular icosahedron and applies `subdivisions` rounds of
/// 1-to-4 midpoint subdivision, projecting new vertices onto the sphere.
/// Normals equal the (unit) positions.
///
/// # Example
///
/// ```
/// use mesh_types::{icosphere, MeshTopology};
///
/// let sphere = icosphere(1);
/// assert_eq!(sphere.vertex_count(), 42);
/// assert_eq!(sphere.face_count(), 80);
/// ```
#[must_use]
pub fn icosphere(subdivisions: u32) -> IndexedMesh {
    let t = f64::midpoint(1.0, 5.0_f64.sqrt());

    let corners = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];

    let mut mesh = IndexedMesh::new();
    for [x, y, z] in corners {
        mesh.vertices.push(sphere_vertex(Vector3::new(x, y, z)));
    }

    mesh.faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        mesh = subdivide_sphere(&mesh);
    }

    mesh
}

fn sphere_vertex(direction: Vector3<f64>) -> Vertex {
    let n = direction.normalize();
    Vertex::with_normal(Point3::from(n), n)
}

fn subdivide_sphere(mesh: &IndexedMesh) -> IndexedMesh {
    let mut out = IndexedMesh::with_capacity(mesh.vertices.len() * 4, mesh.faces.len() * 4);
    out.vertices.clone_from(&mesh.vertices);

    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<Vertex>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *midpoints.entry(key).or_insert_with(|| {
            let pa = vertices[a as usize].position.coords;
            let pb = vertices[b as usize].position.coords;
            vertices.push(sphere_vertex(pa + pb));
            (vertices.len() - 1) as u32
        })
    };

    for &[v0, v1, v2] in &mesh.faces {
        let m01 = midpoint(v0, v1, &mut out.vertices);
        let m12 = midpoint(v1, v2, &mut out.vertices);
        let m20 = midpoint(v2, v0, &mut out.vertices);

        out.faces.push([v0, m01, m20]);
        out.faces.push([v1, m12, m01]);
        out.faces.push([v2, m20, m12]);
        out.faces.push([m01, m12, m20]);
    }

    out
}
