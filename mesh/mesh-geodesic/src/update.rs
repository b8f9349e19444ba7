//! Local distance updates used by the marching loop.
//!
//! The two-point update solves the eikonal equation `|∇T| = F` for a
//! linear `T` over a triangle `(A, B, C)` where `T(A)` and `T(B)` are
//! final and `T(C)` is unknown. Writing `eₐ = A − C`, `e_b = B − C`, `Q`
//! for their Gram matrix and `δ = (T(A) − t, T(B) − t)`, the condition
//! `δᵀ Q⁻¹ δ = F²` is a quadratic in `t`. The solution is accepted only
//! when it is causal: `t ≥ max(T(A), T(B))` and the characteristic
//! direction `−∇T` at `C` points into the triangle.

// Algorithm uses standard mathematical variable names
#![allow(clippy::many_single_char_names)]

use mesh_types::Point3;

/// Relative tolerance on the Gram determinant below which a triangle is
/// treated as degenerate by the update.
const GRAM_TOLERANCE: f64 = 1e-12;

/// Arrival time at `c` along the straight edge from `a`.
#[inline]
pub(crate) fn one_point(c: &Point3<f64>, a: &Point3<f64>, t_a: f64, weight: f64) -> f64 {
    weight.mul_add((c - a).norm(), t_a)
}

/// Arrival time at `c` of the planar front through `a` and `b`.
///
/// Returns `None` when the triangle is degenerate, the discriminant is
/// negative, or the solution is not causal.
pub(crate) fn two_point(
    c: &Point3<f64>,
    a: &Point3<f64>,
    t_a: f64,
    b: &Point3<f64>,
    t_b: f64,
    weight: f64,
) -> Option<f64> {
    let ea = a - c;
    let eb = b - c;
    let q00 = ea.norm_squared();
    let q01 = ea.dot(&eb);
    let q11 = eb.norm_squared();
    let det = q00.mul_add(q11, -(q01 * q01));
    if det <= GRAM_TOLERANCE * q00 * q11 {
        return None;
    }

    // Inverse Gram matrix
    let p00 = q11 / det;
    let p01 = -q01 / det;
    let p11 = q00 / det;

    let alpha = 2.0f64.mul_add(p01, p00 + p11);
    let beta = p00.mul_add(t_a, p01 * (t_a + t_b)) + p11 * t_b;
    let gamma = (2.0 * p01 * t_a).mul_add(t_b, p00 * t_a * t_a) + p11 * t_b * t_b;

    let disc = beta.mul_add(beta, -alpha * (gamma - weight * weight));
    if disc < 0.0 || alpha <= 0.0 {
        return None;
    }

    let t = (beta + disc.sqrt()) / alpha;
    if t < t_a.max(t_b) {
        return None;
    }

    // -∇T = -(λa eₐ + λb e_b) must be a non-negative combination of eₐ, e_b
    let da = t_a - t;
    let db = t_b - t;
    let lambda_a = p00.mul_add(da, p01 * db);
    let lambda_b = p01.mul_add(da, p11 * db);
    if lambda_a > 0.0 || lambda_b > 0.0 {
        return None;
    }

    Some(t)
}
