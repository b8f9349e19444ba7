//! Polygon area.

use nalgebra::Point2;

/// Signed area by the shoelace formula; positive for counter-clockwise
/// vertex order.
///
/// Fewer than three vertices have zero area.
#[must_use]
pub fn signed_area(polygon: &[Point2<f64>]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice: f64 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice * 0.5
}

/// Unsigned area of a simple polygon.
///
/// # Example
///
/// ```
/// use nalgebra::Point2;
/// use polygon_clip::polygon_area;
///
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ];
/// assert!((polygon_area(&square) - 4.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn polygon_area(polygon: &[Point2<f64>]) -> f64 {
    signed_area(polygon).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 4.0),
        ]
    }

    #[test]
    fn orientation_sets_sign() {
        let ccw = triangle();
        let mut cw = ccw.clone();
        cw.reverse();
        assert_relative_eq!(signed_area(&ccw), 6.0, epsilon = 1e-12);
        assert_relative_eq!(signed_area(&cw), -6.0, epsilon = 1e-12);
        assert_relative_eq!(polygon_area(&cw), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_does_not_change_area() {
        let mut polygon = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, -1.0),
            Point2::new(4.0, 1.0),
            Point2::new(3.0, 3.0),
            Point2::new(0.5, 2.5),
        ];
        let area = polygon_area(&polygon);
        for _ in 0..polygon.len() {
            polygon.rotate_left(1);
            assert_relative_eq!(polygon_area(&polygon), area, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_inputs_have_no_area() {
        assert_relative_eq!(polygon_area(&[]), 0.0, epsilon = f64::EPSILON);
        assert_relative_eq!(polygon_area(&triangle()[..2]), 0.0, epsilon = f64::EPSILON);
    }
}
