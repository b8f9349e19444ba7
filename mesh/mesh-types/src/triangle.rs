//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// assert!((tri.angle_at(0) - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// The three corners in order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Corner `i` (taken modulo 3).
    #[inline]
    #[must_use]
    pub const fn corner(&self, i: usize) -> Point3<f64> {
        match i % 3 {
            0 => self.v0,
            1 => self.v1,
            _ => self.v2,
        }
    }

    /// Unnormalized face normal; its magnitude is twice the area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit face normal, or `None` for a zero-area triangle.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON * f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Centroid of the three corners.
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Edge lengths, where entry `i` is the edge opposite corner `i`.
    #[must_use]
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            (self.v2 - self.v1).norm(),
            (self.v0 - self.v2).norm(),
            (self.v1 - self.v0).norm(),
        ]
    }

    /// Interior angle at corner `i`, in radians.
    ///
    /// Returns 0 when one of the adjacent edges has zero length.
    #[must_use]
    pub fn angle_at(&self, i: usize) -> f64 {
        let apex = self.corner(i);
        let a = self.corner(i + 1) - apex;
        let b = self.corner(i + 2) - apex;
        let denom = a.norm() * b.norm();
        if denom <= f64::EPSILON {
            return 0.0;
        }
        (a.dot(&b) / denom).clamp(-1.0, 1.0).acos()
    }

    /// Point at barycentric coordinates `(x, y, 1 - x - y)`.
    #[inline]
    #[must_use]
    pub fn point_at(&self, x: f64, y: f64) -> Point3<f64> {
        Point3::from(self.v0.coords * x + self.v1.coords * y + self.v2.coords * (1.0 - x - y))
    }

    /// Whether the triangle's doubled area is at most `epsilon`.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.normal_unnormalized().norm() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        )
    }

    #[test]
    fn area_and_normal() {
        let tri = right_triangle();
        assert_relative_eq!(tri.area(), 6.0, epsilon = 1e-12);
        let n = tri.normal().unwrap_or_else(Vector3::zeros);
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn edge_lengths_are_opposite_corners() {
        let tri = right_triangle();
        let [a, b, c] = tri.edge_lengths();
        assert_relative_eq!(a, 5.0, epsilon = 1e-12);
        assert_relative_eq!(b, 4.0, epsilon = 1e-12);
        assert_relative_eq!(c, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn angles_sum_to_pi() {
        let tri = right_triangle();
        let sum: f64 = (0..3).map(|i| tri.angle_at(i)).sum();
        assert_relative_eq!(sum, std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn barycentric_point() {
        let tri = right_triangle();
        let p = tri.point_at(1.0, 0.0);
        assert_relative_eq!(p, tri.v0, epsilon = 1e-12);
        let c = tri.point_at(1.0 / 3.0, 1.0 / 3.0);
        assert_relative_eq!(c, tri.centroid(), epsilon = 1e-12);
    }

    #[test]
    fn collinear_is_degenerate() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(tri.is_degenerate(1e-12));
        assert!(tri.normal().is_none());
        assert!(!right_triangle().is_degenerate(1e-12));
    }

    #[test]
    fn coincident_corner_angle_is_zero() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(tri.angle_at(0), 0.0, epsilon = f64::EPSILON);
    }
}
