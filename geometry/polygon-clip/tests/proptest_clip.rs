//! Property-based tests for convex polygon intersection.
//!
//! Run with: cargo test -p polygon-clip -- proptest

use nalgebra::Point2;
use polygon_clip::{intersect_convex, polygon_area, signed_area, PolygonIntersector};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A convex polygon: points on a circle at sorted random angles.
fn arb_convex_polygon() -> impl Strategy<Value = Vec<Point2<f64>>> {
    (
        -1.0..1.0f64,
        -1.0..1.0f64,
        0.2..2.0f64,
        prop::collection::vec(0.0..std::f64::consts::TAU, 3..9),
    )
        .prop_map(|(cx, cy, radius, mut angles)| {
            angles.sort_by(f64::total_cmp);
            angles
                .into_iter()
                .map(|t| Point2::new(cx + radius * t.cos(), cy + radius * t.sin()))
                .collect()
        })
}

/// Half-plane clip of `subject` against every edge of the convex `clip`.
fn reference_area(subject: &[Point2<f64>], clip: &[Point2<f64>]) -> f64 {
    let mut clip = clip.to_vec();
    if signed_area(&clip) < 0.0 {
        clip.reverse();
    }
    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let side = |p: &Point2<f64>| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let p = input[j];
            let q = input[(j + 1) % input.len()];
            let (sp, sq) = (side(&p), side(&q));
            if sp >= 0.0 {
                output.push(p);
            }
            if (sp >= 0.0) != (sq >= 0.0) {
                let t = sp / (sp - sq);
                output.push(p + (q - p) * t);
            }
        }
    }
    polygon_area(&output)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Area agrees with half-plane clipping up to lattice rounding.
    #[test]
    fn area_matches_half_plane_clipping(p in arb_convex_polygon(), q in arb_convex_polygon()) {
        let area = polygon_area(&intersect_convex(&p, &q));
        let expected = reference_area(&p, &q);
        prop_assert!((area - expected).abs() < 1e-3, "{} vs {}", area, expected);
    }

    /// Intersection is symmetric and never larger than either input.
    #[test]
    fn intersection_is_symmetric_and_bounded(p in arb_convex_polygon(), q in arb_convex_polygon()) {
        let mut clip = PolygonIntersector::new();
        clip.perform_intersection(&p, &q);
        let pq = clip.area();
        clip.perform_intersection(&q, &p);
        let qp = clip.area();

        prop_assert!((pq - qp).abs() < 1e-3);
        prop_assert!(pq <= polygon_area(&p) + 1e-3);
        prop_assert!(pq <= polygon_area(&q) + 1e-3);
    }

    /// Results are counter-clockwise or empty.
    #[test]
    fn result_is_ccw_or_empty(p in arb_convex_polygon(), q in arb_convex_polygon()) {
        let result = intersect_convex(&p, &q);
        prop_assert!(result.is_empty() || result.len() >= 3);
        if !result.is_empty() {
            prop_assert!(signed_area(&result) > 0.0);
        }
    }

    /// Rotating the vertex list does not change the area.
    #[test]
    fn area_is_rotation_invariant(p in arb_convex_polygon(), shift in 0usize..8) {
        let mut rotated = p.clone();
        rotated.rotate_left(shift % p.len());
        prop_assert!((polygon_area(&rotated) - polygon_area(&p)).abs() < 1e-12);
    }
}
