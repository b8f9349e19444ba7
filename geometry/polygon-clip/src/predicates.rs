//! Exact orientation and segment predicates on lattice points.
//!
//! Every predicate works on integer coordinates widened to `i128`, so the
//! sign decisions driving the intersection walk are never subject to
//! rounding.

use nalgebra::Point2;

/// A polygon vertex snapped to the integer lattice.
pub(crate) type LatticePoint = [i64; 2];

/// Twice the signed area of triangle `(a, b, c)`.
pub(crate) fn area2(a: LatticePoint, b: LatticePoint, c: LatticePoint) -> i128 {
    let (ax, ay) = (i128::from(a[0]), i128::from(a[1]));
    let (bx, by) = (i128::from(b[0]), i128::from(b[1]));
    let (cx, cy) = (i128::from(c[0]), i128::from(c[1]));
    (bx - ax) * (cy - ay) - (cx - ax) * (by - ay)
}

/// Sign of [`area2`]: `1` for a left turn, `-1` for a right turn, `0` when
/// collinear.
pub(crate) fn area_sign(a: LatticePoint, b: LatticePoint, c: LatticePoint) -> i32 {
    match area2(a, b, c).cmp(&0) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}

pub(crate) fn collinear(a: LatticePoint, b: LatticePoint, c: LatticePoint) -> bool {
    area2(a, b, c) == 0
}

/// Whether `c` lies on the closed segment `ab`.
pub(crate) fn between(a: LatticePoint, b: LatticePoint, c: LatticePoint) -> bool {
    if !collinear(a, b, c) {
        return false;
    }
    // Project onto whichever axis the segment is not perpendicular to
    let axis = usize::from(a[0] == b[0]);
    (a[axis] <= c[axis] && c[axis] <= b[axis]) || (a[axis] >= c[axis] && c[axis] >= b[axis])
}

/// How two segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentCode {
    /// Interiors cross at a single point.
    Proper,
    /// The single crossing point is an endpoint of one of the segments.
    Vertex,
    /// No common point.
    Disjoint,
    /// Collinear segments sharing a sub-segment `p..q`.
    Overlap,
}

/// Result of [`seg_seg_int`]. `q` is only meaningful for
/// [`SegmentCode::Overlap`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentHit {
    pub code: SegmentCode,
    pub p: Point2<f64>,
    pub q: Point2<f64>,
}

#[allow(clippy::cast_precision_loss)]
fn to_point(v: LatticePoint) -> Point2<f64> {
    Point2::new(v[0] as f64, v[1] as f64)
}

/// Intersect segment `ab` with segment `cd`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn seg_seg_int(
    a: LatticePoint,
    b: LatticePoint,
    c: LatticePoint,
    d: LatticePoint,
) -> SegmentHit {
    let (ax, ay) = (i128::from(a[0]), i128::from(a[1]));
    let (bx, by) = (i128::from(b[0]), i128::from(b[1]));
    let (cx, cy) = (i128::from(c[0]), i128::from(c[1]));
    let (dx, dy) = (i128::from(d[0]), i128::from(d[1]));

    let mut denom = ax * (dy - cy) + bx * (cy - dy) + dx * (by - ay) + cx * (ay - by);
    if denom == 0 {
        return parallel_int(a, b, c, d);
    }

    let mut s_num = ax * (dy - cy) + cx * (ay - dy) + dx * (cy - ay);
    let mut t_num = -(ax * (cy - by) + bx * (ay - cy) + cx * (by - ay));
    if denom < 0 {
        denom = -denom;
        s_num = -s_num;
        t_num = -t_num;
    }

    // Exact rational classification of s = s_num / denom and t = t_num / denom
    let code = if s_num < 0 || s_num > denom || t_num < 0 || t_num > denom {
        SegmentCode::Disjoint
    } else if s_num == 0 || s_num == denom || t_num == 0 || t_num == denom {
        SegmentCode::Vertex
    } else {
        SegmentCode::Proper
    };

    let s = s_num as f64 / denom as f64;
    let pa = to_point(a);
    let pb = to_point(b);
    let p = pa + (pb - pa) * s;
    SegmentHit { code, p, q: p }
}

fn parallel_int(a: LatticePoint, b: LatticePoint, c: LatticePoint, d: LatticePoint) -> SegmentHit {
    let overlap = |p: LatticePoint, q: LatticePoint| SegmentHit {
        code: SegmentCode::Overlap,
        p: to_point(p),
        q: to_point(q),
    };

    if !collinear(a, b, c) {
        return SegmentHit {
            code: SegmentCode::Disjoint,
            p: to_point(a),
            q: to_point(a),
        };
    }

    if between(a, b, c) && between(a, b, d) {
        overlap(c, d)
    } else if between(c, d, a) && between(c, d, b) {
        overlap(a, b)
    } else if between(a, b, c) && between(c, d, b) {
        overlap(c, b)
    } else if between(a, b, c) && between(c, d, a) {
        overlap(c, a)
    } else if between(a, b, d) && between(c, d, b) {
        overlap(d, b)
    } else if between(a, b, d) && between(c, d, a) {
        overlap(d, a)
    } else {
        SegmentHit {
            code: SegmentCode::Disjoint,
            p: to_point(a),
            q: to_point(a),
        }
    }
}

/// Which polygon's boundary is currently inside the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inside {
    P,
    Q,
    Unknown,
}

/// Update the inside flag after a crossing, from the half-plane signs of the
/// current edge heads.
pub(crate) fn in_out(current: Inside, a_in_hb: i32, b_in_ha: i32) -> Inside {
    if a_in_hb > 0 {
        Inside::P
    } else if b_in_ha > 0 {
        Inside::Q
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orientation_signs() {
        assert_eq!(area_sign([0, 0], [1, 0], [0, 1]), 1);
        assert_eq!(area_sign([0, 0], [0, 1], [1, 0]), -1);
        assert_eq!(area_sign([0, 0], [1, 1], [2, 2]), 0);
    }

    #[test]
    fn between_on_vertical_segment() {
        assert!(between([0, 0], [0, 4], [0, 2]));
        assert!(between([0, 4], [0, 0], [0, 4]));
        assert!(!between([0, 0], [0, 4], [0, 5]));
        assert!(!between([0, 0], [0, 4], [1, 2]));
    }

    #[test]
    fn proper_crossing() {
        let hit = seg_seg_int([0, 0], [4, 4], [0, 4], [4, 0]);
        assert_eq!(hit.code, SegmentCode::Proper);
        assert_relative_eq!(hit.p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(hit.p.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn endpoint_touch_is_vertex() {
        let hit = seg_seg_int([0, 0], [2, 0], [2, 0], [2, 3]);
        assert_eq!(hit.code, SegmentCode::Vertex);
        assert_relative_eq!(hit.p.x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn separate_segments() {
        let hit = seg_seg_int([0, 0], [1, 0], [3, -1], [3, 1]);
        assert_eq!(hit.code, SegmentCode::Disjoint);

        // Parallel but offset
        let hit = seg_seg_int([0, 0], [4, 0], [0, 1], [4, 1]);
        assert_eq!(hit.code, SegmentCode::Disjoint);
    }

    #[test]
    fn collinear_overlap() {
        let hit = seg_seg_int([0, 0], [4, 0], [2, 0], [6, 0]);
        assert_eq!(hit.code, SegmentCode::Overlap);
        assert_relative_eq!(hit.p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(hit.q.x, 4.0, epsilon = 1e-12);

        let hit = seg_seg_int([0, 0], [1, 0], [2, 0], [3, 0]);
        assert_eq!(hit.code, SegmentCode::Disjoint);
    }

    #[test]
    fn in_out_prefers_p() {
        assert_eq!(in_out(Inside::Unknown, 1, 1), Inside::P);
        assert_eq!(in_out(Inside::P, 0, 1), Inside::Q);
        assert_eq!(in_out(Inside::Q, 0, 0), Inside::Q);
    }
}
