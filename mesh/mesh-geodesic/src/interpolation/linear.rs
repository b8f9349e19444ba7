//! Barycentric (linear) interpolation.

use mesh_types::Vector3;

use super::{FaceStencil, EPSILON};
use crate::error::{GeodesicError, GeodesicResult};

/// Linear model `d₀x + d₁y + d₂(1 − x − y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolation {
    face: Option<u32>,
    values: [f64; 3],
    e0: Vector3<f64>,
    e1: Vector3<f64>,
}

impl LinearInterpolation {
    /// Build from a stencil; only the corners are used.
    #[must_use]
    pub fn new(stencil: &FaceStencil) -> Self {
        let [p0, p1, p2] = stencil.corners;
        Self {
            face: stencil.face,
            values: stencil.values,
            e0: p0 - p2,
            e1: p1 - p2,
        }
    }

    /// Interpolated value at parameter `(x, y)`.
    #[must_use]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        let [d0, d1, d2] = self.values;
        d0.mul_add(x, d1.mul_add(y, d2 * (1.0 - x - y)))
    }

    /// Constant gradient over the face.
    ///
    /// Solves `g·ê₀ = (d₀ − d₂)/|e₀|`, `g·ê₁ = (d₁ − d₂)/|e₁|` for `g` in the
    /// span of the edges using the inverse of `[[1, dot], [dot, 1]]`.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::DegenerateGeometry`] when an edge has zero
    /// length or `1 − dot² ≤ EPSILON`.
    pub fn gradient(&self) -> GeodesicResult<Vector3<f64>> {
        let [d0, d1, d2] = self.values;
        let len0 = self.e0.norm();
        let len1 = self.e1.norm();
        if len0 <= EPSILON || len1 <= EPSILON {
            return Err(GeodesicError::DegenerateGeometry {
                face: self.face,
                determinant: 0.0,
            });
        }

        let n0 = self.e0 / len0;
        let n1 = self.e1 / len1;
        let dot = n0.dot(&n1);
        let det = dot.mul_add(-dot, 1.0);
        if det <= EPSILON {
            return Err(GeodesicError::DegenerateGeometry {
                face: self.face,
                determinant: det,
            });
        }

        let a = (d0 - d2) / len0;
        let b = (d1 - d2) / len1;
        let alpha = dot.mul_add(-b, a) / det;
        let beta = dot.mul_add(-a, b) / det;
        Ok(n0 * alpha + n1 * beta)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::Point3;

    #[test]
    fn right_triangle_reproduces_euclidean_distance() {
        // Source at the origin (corner 2); the other corners are at distance 1
        let stencil = FaceStencil::isolated(
            [
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::origin(),
            ],
            [1.0, 1.0, 0.0],
        );
        let model = LinearInterpolation::new(&stencil);
        assert_relative_eq!(model.value(1.0, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(model.value(0.0, 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(model.value(0.0, 0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(model.value(0.25, 0.25), 0.5, epsilon = 1e-12);

        let g = model.gradient().unwrap();
        assert_relative_eq!(g, Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn gradient_on_skewed_triangle() {
        // f(p) = 2x - y + 3 sampled on an obtuse triangle
        let f = |p: &Point3<f64>| 2.0f64.mul_add(p.x, -p.y) + 3.0;
        let corners = [
            Point3::new(3.0, 0.5, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(0.2, 0.0, 0.0),
        ];
        let stencil = FaceStencil::isolated(corners, corners.map(|p| f(&p)));
        let g = LinearInterpolation::new(&stencil).gradient().unwrap();
        assert_relative_eq!(g, Vector3::new(2.0, -1.0, 0.0), epsilon = 1e-10);
    }

    #[test]
    fn collinear_corners_fail() {
        let stencil = FaceStencil::isolated(
            [
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::origin(),
            ],
            [1.0, 2.0, 0.0],
        );
        let err = LinearInterpolation::new(&stencil).gradient().unwrap_err();
        assert!(matches!(err, GeodesicError::DegenerateGeometry { .. }));
    }

    #[test]
    fn coincident_corners_fail() {
        let mut stencil = FaceStencil::isolated(
            [Point3::origin(), Point3::new(0.0, 1.0, 0.0), Point3::origin()],
            [0.0, 1.0, 0.0],
        );
        stencil.face = Some(9);
        let err = LinearInterpolation::new(&stencil).gradient().unwrap_err();
        assert_eq!(
            err,
            GeodesicError::DegenerateGeometry {
                face: Some(9),
                determinant: 0.0
            }
        );
    }
}
