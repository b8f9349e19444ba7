//! Property-based tests for fast marching.
//!
//! Run with: cargo test -p mesh-geodesic -- proptest

use mesh_geodesic::{FastMarchingParams, GeodesicMesh, InterpolationKind, VertexState};
use mesh_types::{IndexedMesh, planar_grid};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A planar grid with every vertex displaced by a bounded height field.
fn arb_bumpy_grid() -> impl Strategy<Value = IndexedMesh> {
    (2usize..8, 2usize..8).prop_flat_map(|(cols, rows)| {
        let count = (cols + 1) * (rows + 1);
        prop::collection::vec(-0.4..0.4f64, count).prop_map(move |heights| {
            let mut mesh = planar_grid(cols, rows, 1.0);
            for (vertex, h) in mesh.vertices.iter_mut().zip(heights) {
                vertex.position.z = h;
                vertex.normal = None;
            }
            mesh
        })
    })
}

/// Mesh plus a non-empty set of valid source indices.
fn arb_mesh_and_sources() -> impl Strategy<Value = (IndexedMesh, Vec<u32>)> {
    arb_bumpy_grid().prop_flat_map(|mesh| {
        let n = mesh.vertices.len() as u32;
        (Just(mesh), prop::collection::vec(0..n, 1..4))
    })
}

/// Edge-graph shortest paths from a set of sources.
fn graph_distances(mesh: &IndexedMesh, sources: &[u32]) -> Vec<f64> {
    let n = mesh.vertices.len();
    let mut dist = vec![f64::INFINITY; n];
    for &s in sources {
        dist[s as usize] = 0.0;
    }
    // Bellman-Ford style relaxation; the meshes are small
    for _ in 0..n {
        let mut changed = false;
        for face in &mesh.faces {
            for k in 0..3 {
                let a = face[k] as usize;
                let b = face[(k + 1) % 3] as usize;
                let len = (mesh.vertices[a].position - mesh.vertices[b].position).norm();
                if dist[a] + len < dist[b] {
                    dist[b] = dist[a] + len;
                    changed = true;
                }
                if dist[b] + len < dist[a] {
                    dist[a] = dist[b] + len;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    dist
}

// =============================================================================
// Property Tests: Distances
// =============================================================================

proptest! {
    /// Distances are finite, non-negative and bounded by the edge graph.
    #[test]
    fn distances_bounded_by_edge_graph((mesh, sources) in arb_mesh_and_sources()) {
        let mut geo = GeodesicMesh::new(&mesh).unwrap();
        let report = geo.march(&sources, &FastMarchingParams::default()).unwrap();
        prop_assert!(report.is_complete());

        let graph = graph_distances(&mesh, &sources);
        for v in 0..mesh.vertices.len() as u32 {
            let d = geo.distance(v);
            prop_assert!(d.is_finite() && d >= 0.0);
            prop_assert!(d <= graph[v as usize] + 1e-9, "vertex {}: {} > {}", v, d, graph[v as usize]);
        }
        for &s in &sources {
            prop_assert!(geo.distance(s).abs() < f64::EPSILON);
        }
    }

    /// Every vertex inherits a source front no farther than itself.
    #[test]
    fn fronts_are_sources_and_monotone((mesh, sources) in arb_mesh_and_sources()) {
        let mut geo = GeodesicMesh::new(&mesh).unwrap();
        geo.march(&sources, &FastMarchingParams::default()).unwrap();

        for v in 0..mesh.vertices.len() as u32 {
            let front = geo.front(v).unwrap();
            prop_assert!(sources.contains(&front));
            prop_assert!(geo.distance(front) <= geo.distance(v));

            let overlap = geo.vertex(v).unwrap().front_overlap();
            prop_assert!(overlap.iter().count() <= 2);
        }
    }

    /// A stopping radius never finalizes a vertex beyond it.
    #[test]
    fn radius_bounds_dead_vertices(
        (mesh, sources) in arb_mesh_and_sources(),
        radius in 0.5..4.0f64,
    ) {
        let mut geo = GeodesicMesh::new(&mesh).unwrap();
        geo.march(&sources, &FastMarchingParams::with_radius(radius)).unwrap();

        for vertex in geo.vertices() {
            if vertex.state() == VertexState::Dead {
                prop_assert!(vertex.distance() <= radius);
            }
        }
    }
}

// =============================================================================
// Property Tests: Interpolation
// =============================================================================

proptest! {
    /// Every model reproduces the corner distances and never yields NaN.
    #[test]
    fn interpolation_matches_corners((mesh, sources) in arb_mesh_and_sources()) {
        let mut geo = GeodesicMesh::new(&mesh).unwrap();
        geo.march(&sources, &FastMarchingParams::default()).unwrap();

        for kind in [InterpolationKind::Linear, InterpolationKind::Quadratic] {
            geo.set_interpolation_kind(kind);
            for face in 0..geo.face_count() as u32 {
                let [a, b, c] = mesh.faces[face as usize];
                let corners = [(1.0, 0.0, a), (0.0, 1.0, b), (0.0, 0.0, c)];
                for (x, y, v) in corners {
                    let value = geo.value_at(face, x, y).unwrap();
                    prop_assert!((value - geo.distance(v)).abs() < 1e-6);
                }
                let g = geo.gradient_at(face, 1.0 / 3.0, 1.0 / 3.0).unwrap();
                prop_assert!(g.iter().all(|c| c.is_finite()));
            }
        }

        geo.set_interpolation_kind(InterpolationKind::Cubic);
        for face in 0..geo.face_count() as u32 {
            let value = geo.value_at(face, 1.0 / 3.0, 1.0 / 3.0).unwrap();
            prop_assert!(value.is_finite());
        }
    }
}
