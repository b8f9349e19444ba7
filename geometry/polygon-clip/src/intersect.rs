//! Convex polygon intersection.

use nalgebra::Point2;
use tracing::{debug, warn};

use crate::area::polygon_area;
use crate::predicates::{
    area2, area_sign, in_out, seg_seg_int, Inside, LatticePoint, SegmentCode,
};

/// Largest lattice coordinate accepted; keeps `f64` to `i64` conversion exact.
const MAX_LATTICE: f64 = 1e15;

/// Consecutive output points closer than this (in lattice units) are merged.
const MERGE_TOLERANCE: f64 = 1e-6;

/// Intersects two convex polygons with O'Rourke's edge-chasing walk.
///
/// Inputs are scaled by [`SCALE`](Self::SCALE) and rounded, so all
/// orientation tests are exact integer arithmetic. Only the crossing points
/// themselves are computed in floating point before being scaled back.
///
/// The intersector keeps the most recent result and nothing else. A result
/// with fewer than three vertices means the polygons do not overlap in a
/// region of positive area (disjoint, touching, or sharing an edge from
/// opposite sides); it is reported as an empty polygon, never as an error.
///
/// # Example
///
/// ```
/// use nalgebra::Point2;
/// use polygon_clip::PolygonIntersector;
///
/// let square = |x0: f64, y0: f64, s: f64| {
///     vec![
///         Point2::new(x0, y0),
///         Point2::new(x0 + s, y0),
///         Point2::new(x0 + s, y0 + s),
///         Point2::new(x0, y0 + s),
///     ]
/// };
///
/// let mut clip = PolygonIntersector::new();
/// let overlap = clip.perform_intersection(&square(0.0, 0.0, 2.0), &square(1.0, 1.0, 2.0));
/// assert_eq!(overlap.len(), 4);
/// assert!((clip.area() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolygonIntersector {
    result: Vec<Point2<f64>>,
}

impl PolygonIntersector {
    /// Lattice resolution: coordinates are multiplied by this factor and
    /// rounded before intersecting.
    pub const SCALE: f64 = 50_000.0;

    /// Create an intersector with an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self { result: Vec::new() }
    }

    /// Intersect convex polygons `p` and `q` and keep the result.
    ///
    /// Either orientation is accepted; the result is counter-clockwise.
    /// Polygons with fewer than three distinct lattice vertices, zero area,
    /// or non-finite coordinates produce an empty result.
    pub fn perform_intersection(&mut self, p: &[Point2<f64>], q: &[Point2<f64>]) -> &[Point2<f64>] {
        self.result.clear();

        let (Some(p), Some(q)) = (to_lattice(p), to_lattice(q)) else {
            warn!("polygon coordinates are not finite or exceed the lattice range");
            return &self.result;
        };
        if p.len() < 3 || q.len() < 3 {
            debug!(p = p.len(), q = q.len(), "degenerate input polygon");
            return &self.result;
        }

        let lattice = convex_intersect(&p, &q);
        if lattice.len() >= 3 {
            self.result = lattice
                .into_iter()
                .map(|v| Point2::new(v.x / Self::SCALE, v.y / Self::SCALE))
                .collect();
        }
        &self.result
    }

    /// The polygon from the last [`perform_intersection`](Self::perform_intersection).
    #[must_use]
    pub fn intersection_polygon(&self) -> &[Point2<f64>] {
        &self.result
    }

    /// Whether the last intersection is a polygon of positive area.
    #[must_use]
    pub fn has_intersection(&self) -> bool {
        self.result.len() >= 3
    }

    /// Area of the last intersection polygon.
    #[must_use]
    pub fn area(&self) -> f64 {
        polygon_area(&self.result)
    }
}

/// Intersect two convex polygons without keeping an intersector around.
#[must_use]
pub fn intersect_convex(p: &[Point2<f64>], q: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut clip = PolygonIntersector::new();
    clip.perform_intersection(p, q);
    clip.result
}

/// Snap to the lattice, drop repeated vertices and orient counter-clockwise.
#[allow(clippy::cast_possible_truncation)]
fn to_lattice(polygon: &[Point2<f64>]) -> Option<Vec<LatticePoint>> {
    let mut lattice: Vec<LatticePoint> = Vec::with_capacity(polygon.len());
    for v in polygon {
        let x = (v.x * PolygonIntersector::SCALE).round();
        let y = (v.y * PolygonIntersector::SCALE).round();
        if !x.is_finite() || !y.is_finite() || x.abs() > MAX_LATTICE || y.abs() > MAX_LATTICE {
            return None;
        }
        let point = [x as i64, y as i64];
        if lattice.last() != Some(&point) {
            lattice.push(point);
        }
    }
    while lattice.len() > 1 && lattice.first() == lattice.last() {
        lattice.pop();
    }

    let twice_area: i128 = (0..lattice.len())
        .map(|i| area2([0, 0], lattice[i], lattice[(i + 1) % lattice.len()]))
        .sum();
    match twice_area.cmp(&0) {
        std::cmp::Ordering::Less => lattice.reverse(),
        std::cmp::Ordering::Equal => lattice.clear(),
        std::cmp::Ordering::Greater => {}
    }
    Some(lattice)
}

#[allow(clippy::cast_precision_loss)]
fn lattice_to_f64(v: LatticePoint) -> Point2<f64> {
    Point2::new(v[0] as f64, v[1] as f64)
}

/// Walk position along one polygon's boundary.
struct Cursor {
    index: usize,
    advanced: usize,
    len: usize,
}

impl Cursor {
    const fn new(len: usize) -> Self {
        Self {
            index: 0,
            advanced: 0,
            len,
        }
    }

    const fn previous(&self) -> usize {
        (self.index + self.len - 1) % self.len
    }

    /// Step to the next edge, emitting the current head vertex if this
    /// polygon's boundary is the inner one.
    fn advance(&mut self, inside: bool, head: LatticePoint, out: &mut Vec<Point2<f64>>) {
        if inside {
            out.push(lattice_to_f64(head));
        }
        self.advanced += 1;
        self.index = (self.index + 1) % self.len;
    }
}

/// Both polygons are counter-clockwise with at least three vertices.
/// Returns the intersection in lattice coordinates.
fn convex_intersect(p: &[LatticePoint], q: &[LatticePoint]) -> Vec<Point2<f64>> {
    let n = p.len();
    let m = q.len();
    let mut a = Cursor::new(n);
    let mut b = Cursor::new(m);
    let mut inside = Inside::Unknown;
    let mut first_point = true;
    let mut out = Vec::new();

    loop {
        let a_tail = p[a.previous()];
        let a_head = p[a.index];
        let b_tail = q[b.previous()];
        let b_head = q[b.index];

        let edge_a = [a_head[0] - a_tail[0], a_head[1] - a_tail[1]];
        let edge_b = [b_head[0] - b_tail[0], b_head[1] - b_tail[1]];

        let cross = area_sign([0, 0], edge_a, edge_b);
        let a_in_hb = area_sign(b_tail, b_head, a_head);
        let b_in_ha = area_sign(a_tail, a_head, b_head);

        let hit = seg_seg_int(a_tail, a_head, b_tail, b_head);
        if matches!(hit.code, SegmentCode::Proper | SegmentCode::Vertex) {
            if inside == Inside::Unknown && first_point {
                // Count full laps from the first crossing
                a.advanced = 0;
                b.advanced = 0;
                first_point = false;
            }
            out.push(hit.p);
            inside = in_out(inside, a_in_hb, b_in_ha);
        }

        let dot = i128::from(edge_a[0]) * i128::from(edge_b[0])
            + i128::from(edge_a[1]) * i128::from(edge_b[1]);
        if hit.code == SegmentCode::Overlap && dot < 0 {
            debug!(
                from = ?hit.p,
                to = ?hit.q,
                "polygons share an edge with opposite orientation"
            );
            return Vec::new();
        }

        if cross == 0 && a_in_hb < 0 && b_in_ha < 0 {
            debug!("parallel separating edges: polygons are disjoint");
            return Vec::new();
        } else if cross == 0 && a_in_hb == 0 && b_in_ha == 0 {
            // Collinear edges: advance the outer one
            if inside == Inside::P {
                b.advance(inside == Inside::Q, b_head, &mut out);
            } else {
                a.advance(inside == Inside::P, a_head, &mut out);
            }
        } else if cross >= 0 {
            if b_in_ha > 0 {
                a.advance(inside == Inside::P, a_head, &mut out);
            } else {
                b.advance(inside == Inside::Q, b_head, &mut out);
            }
        } else if a_in_hb > 0 {
            b.advance(inside == Inside::Q, b_head, &mut out);
        } else {
            a.advance(inside == Inside::P, a_head, &mut out);
        }

        let keep_going = (a.advanced < n || b.advanced < m) && a.advanced < 2 * n && b.advanced < 2 * m;
        if !keep_going {
            break;
        }
    }

    if inside == Inside::Unknown {
        // The boundaries never crossed: one polygon contains the other or
        // they are disjoint
        return if contains(q, p) {
            p.iter().copied().map(lattice_to_f64).collect()
        } else if contains(p, q) {
            q.iter().copied().map(lattice_to_f64).collect()
        } else {
            Vec::new()
        };
    }

    merge_duplicates(out)
}

/// Whether every vertex of `inner` lies in the closed convex polygon `outer`.
fn contains(outer: &[LatticePoint], inner: &[LatticePoint]) -> bool {
    inner.iter().all(|&v| {
        (0..outer.len()).all(|i| area_sign(outer[i], outer[(i + 1) % outer.len()], v) >= 0)
    })
}

fn merge_duplicates(points: Vec<Point2<f64>>) -> Vec<Point2<f64>> {
    let mut merged: Vec<Point2<f64>> = Vec::with_capacity(points.len());
    for v in points {
        if merged
            .last()
            .is_none_or(|last| (last - v).norm() > MERGE_TOLERANCE)
        {
            merged.push(v);
        }
    }
    while merged.len() > 1 {
        match (merged.first(), merged.last()) {
            (Some(first), Some(last)) if (first - last).norm() <= MERGE_TOLERANCE => {
                merged.pop();
            }
            _ => break,
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ]
    }

    fn hexagon(radius: f64, phase: f64) -> Vec<Point2<f64>> {
        (0..6)
            .map(|k| {
                let t = phase + f64::from(k) * std::f64::consts::FRAC_PI_3;
                Point2::new(radius * t.cos(), radius * t.sin())
            })
            .collect()
    }

    fn contains_point(polygon: &[Point2<f64>], x: f64, y: f64) -> bool {
        polygon
            .iter()
            .any(|v| (v.x - x).abs() < 1e-9 && (v.y - y).abs() < 1e-9)
    }

    #[test]
    fn overlapping_squares() {
        let mut clip = PolygonIntersector::new();
        let result = clip.perform_intersection(&square(0.0, 0.0, 2.0), &square(1.0, 1.0, 2.0));

        assert_eq!(result.len(), 4);
        for (x, y) in [(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)] {
            assert!(contains_point(result, x, y), "missing ({x}, {y})");
        }
        assert_relative_eq!(clip.area(), 1.0, epsilon = 1e-9);
        assert!(clip.has_intersection());
    }

    #[test]
    fn self_intersection_keeps_area() {
        let p = hexagon(1.5, 0.2);
        let mut clip = PolygonIntersector::new();
        clip.perform_intersection(&p, &p);
        // Off-lattice vertices move by at most half a lattice step
        assert_relative_eq!(clip.area(), polygon_area(&p), epsilon = 1e-3);
    }

    #[test]
    fn nested_polygon_is_returned() {
        let outer = square(-2.0, -2.0, 4.0);
        let inner = hexagon(1.0, 0.0);

        let mut clip = PolygonIntersector::new();
        clip.perform_intersection(&outer, &inner);
        assert_relative_eq!(clip.area(), polygon_area(&inner), epsilon = 1e-3);
        assert_eq!(clip.intersection_polygon().len(), 6);

        clip.perform_intersection(&inner, &outer);
        assert_relative_eq!(clip.area(), polygon_area(&inner), epsilon = 1e-3);
    }

    #[test]
    fn disjoint_polygons_are_empty() {
        let mut clip = PolygonIntersector::new();
        clip.perform_intersection(&square(0.0, 0.0, 1.0), &square(3.0, 0.5, 1.0));
        assert!(clip.intersection_polygon().is_empty());
        assert!(!clip.has_intersection());
        assert_relative_eq!(clip.area(), 0.0, epsilon = f64::EPSILON);
    }

    #[test]
    fn shared_edge_from_opposite_sides_is_empty() {
        let mut clip = PolygonIntersector::new();
        clip.perform_intersection(&square(0.0, 0.0, 1.0), &square(1.0, 0.0, 1.0));
        assert!(clip.intersection_polygon().len() < 3);
        assert!(clip.area() < 1e-9);
    }

    #[test]
    fn clockwise_input_is_accepted() {
        let mut p = square(0.0, 0.0, 2.0);
        p.reverse();
        let mut clip = PolygonIntersector::new();
        clip.perform_intersection(&p, &square(1.0, 1.0, 2.0));
        assert_relative_eq!(clip.area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn triangle_clips_square() {
        let triangle = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        ];
        let result = intersect_convex(&square(1.0, 1.0, 2.0), &triangle);
        // Square [1,3]^2 under the line x + y = 4 keeps the lower-left half
        assert_relative_eq!(polygon_area(&result), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_inputs_are_empty() {
        let line = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        let mut clip = PolygonIntersector::new();
        assert!(clip.perform_intersection(&line, &square(0.0, 0.0, 2.0)).is_empty());
        assert!(clip.perform_intersection(&square(0.0, 0.0, 1.0)[..2], &square(0.0, 0.0, 1.0)).is_empty());

        let bad = vec![
            Point2::new(f64::NAN, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(clip.perform_intersection(&bad, &square(0.0, 0.0, 1.0)).is_empty());
    }

    #[test]
    fn previous_result_is_replaced() {
        let mut clip = PolygonIntersector::new();
        clip.perform_intersection(&square(0.0, 0.0, 2.0), &square(1.0, 1.0, 2.0));
        assert!(clip.has_intersection());
        clip.perform_intersection(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0));
        assert!(!clip.has_intersection());
    }
}
