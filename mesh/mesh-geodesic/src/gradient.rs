//! Per-vertex gradient estimate from the 1-ring.

use std::f64::consts::TAU;

use mesh_types::{Vector2, Vector3};
use nalgebra::Matrix2;

use crate::connectivity::MeshConnectivity;

/// Least-squares gradient of `distance` at `vertex`.
///
/// The ordered 1-ring is flattened with the subtended-angle
/// parameterization: neighbor `k` lands at `r_k (cos φ_k, sin φ_k)` where
/// `φ_k` accumulates the angles between consecutive ring edges (rescaled
/// to a full turn for interior vertices). The 2D gradient minimizing
/// `Σ (g·t_k − (d_k − d))²` is mapped back to the tangent plane.
/// Unreached neighbors are ignored; fewer than two usable neighbors or a
/// singular normal matrix give a zero gradient.
pub(crate) fn vertex_gradient(
    conn: &MeshConnectivity,
    distance: impl Fn(u32) -> f64,
    vertex: u32,
) -> Vector3<f64> {
    let center = conn.position(vertex);
    let d = distance(vertex);
    if !d.is_finite() {
        return Vector3::zeros();
    }

    let ring = conn.ordered_ring(vertex);
    if ring.len() < 2 {
        return Vector3::zeros();
    }

    let edges: Vec<Vector3<f64>> = ring.iter().map(|&n| conn.position(n) - center).collect();
    if edges.iter().any(|e| e.norm() <= f64::EPSILON) {
        return Vector3::zeros();
    }

    let closed = !conn.is_boundary(vertex);
    let mut angles = Vec::with_capacity(edges.len());
    let mut phi = 0.0;
    angles.push(0.0);
    for pair in edges.windows(2) {
        phi += pair[0].angle(&pair[1]);
        angles.push(phi);
    }
    if closed {
        let total = phi + edges[edges.len() - 1].angle(&edges[0]);
        if total > f64::EPSILON {
            let scale = TAU / total;
            for a in &mut angles {
                *a *= scale;
            }
        }
    }

    let mut normal_matrix = Matrix2::zeros();
    let mut rhs = Vector2::zeros();
    let mut used = 0usize;
    for ((&n, e), &phi) in ring.iter().zip(&edges).zip(&angles) {
        let dn = distance(n);
        if !dn.is_finite() {
            continue;
        }
        let (sin, cos) = phi.sin_cos();
        let t = Vector2::new(cos, sin) * e.norm();
        normal_matrix += t * t.transpose();
        rhs += t * (dn - d);
        used += 1;
    }
    if used < 2 {
        return Vector3::zeros();
    }

    let Some(g) = normal_matrix.try_inverse().map(|inv| inv * rhs) else {
        return Vector3::zeros();
    };

    // Tangent frame: X along the first ring edge projected on the tangent plane
    let normal = conn.normal(vertex);
    let projected = edges[0] - normal * edges[0].dot(&normal);
    let Some(x_axis) = projected.try_normalize(f64::EPSILON) else {
        return Vector3::zeros();
    };
    let y_axis = normal.cross(&x_axis);

    x_axis * g.x + y_axis * g.y
}
