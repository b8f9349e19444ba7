//! Small polynomial fits in a triangle's parameter space.

use nalgebra::{DMatrix, DVector, Matrix6, Point2, Vector2, Vector6};

/// Singular values below this are treated as zero by the least-squares solve.
const SVD_EPSILON: f64 = 1e-12;

/// Monomials `1, x, y, xy, x², y²`.
#[inline]
pub(crate) fn quadratic_basis(x: f64, y: f64) -> [f64; 6] {
    [1.0, x, y, x * y, x * x, y * y]
}

/// Monomials `1, x, y, x², xy, y², x³, x²y, xy², y³`.
#[inline]
pub(crate) fn cubic_basis(x: f64, y: f64) -> [f64; 10] {
    [
        1.0,
        x,
        y,
        x * x,
        x * y,
        y * y,
        x * x * x,
        x * x * y,
        x * y * y,
        y * y * y,
    ]
}

/// Partial derivatives of [`cubic_basis`] with respect to `x` and `y`.
#[inline]
pub(crate) fn cubic_basis_derivatives(x: f64, y: f64) -> ([f64; 10], [f64; 10]) {
    (
        [
            0.0,
            1.0,
            0.0,
            2.0 * x,
            y,
            0.0,
            3.0 * x * x,
            2.0 * x * y,
            y * y,
            0.0,
        ],
        [
            0.0,
            0.0,
            1.0,
            0.0,
            x,
            2.0 * y,
            0.0,
            x * x,
            2.0 * x * y,
            3.0 * y * y,
        ],
    )
}

/// Fit `f(x, y) = c₀ + c₁x + c₂y + c₃xy + c₄x² + c₅y²` through six samples.
///
/// Tries an exact LU solve first and falls back to an SVD least-squares
/// solve when the sample layout is (nearly) singular. Returns `None` only
/// when both fail or produce non-finite coefficients.
///
/// # Example
///
/// ```
/// use mesh_geodesic::fit_quadratic_2d;
/// use nalgebra::Point2;
///
/// let points = [
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(0.5, 0.5),
///     Point2::new(0.0, 0.5),
///     Point2::new(0.5, 0.0),
/// ];
/// let values = points.map(|p| 1.0 + p.x * p.y);
/// let c = fit_quadratic_2d(&points, &values).unwrap();
/// assert!((c[0] - 1.0).abs() < 1e-9);
/// assert!((c[3] - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn fit_quadratic_2d(points: &[Point2<f64>; 6], values: &[f64; 6]) -> Option<[f64; 6]> {
    let a = Matrix6::from_fn(|row, col| quadratic_basis(points[row].x, points[row].y)[col]);
    let b = Vector6::from_column_slice(values);

    if let Some(c) = a.lu().solve(&b) {
        if c.iter().all(|v| v.is_finite()) {
            return Some(c.into());
        }
    }

    let a = DMatrix::from_fn(6, 6, |row, col| {
        quadratic_basis(points[row].x, points[row].y)[col]
    });
    let b = DVector::from_column_slice(values);
    let c = a.svd(true, true).solve(&b, SVD_EPSILON).ok()?;
    if !c.iter().all(|v| v.is_finite()) {
        return None;
    }

    let mut out = [0.0; 6];
    out.copy_from_slice(c.as_slice());
    Some(out)
}

/// Least-squares cubic through six value samples and three gradient samples.
///
/// `gradients` holds `(location, ∂f/∂x, ∂f/∂y)` triples. Value rows come
/// first; the system has 12 rows for 10 unknowns.
#[must_use]
pub(crate) fn fit_cubic_2d(
    points: &[Point2<f64>; 6],
    values: &[f64; 6],
    gradients: &[(Point2<f64>, Vector2<f64>); 3],
) -> Option<[f64; 10]> {
    let mut a = DMatrix::zeros(12, 10);
    let mut b = DVector::zeros(12);

    for (row, (p, &value)) in points.iter().zip(values).enumerate() {
        for (col, m) in cubic_basis(p.x, p.y).into_iter().enumerate() {
            a[(row, col)] = m;
        }
        b[row] = value;
    }

    for (k, (p, g)) in gradients.iter().enumerate() {
        let (dx, dy) = cubic_basis_derivatives(p.x, p.y);
        let row = 6 + 2 * k;
        for col in 0..10 {
            a[(row, col)] = dx[col];
            a[(row + 1, col)] = dy[col];
        }
        b[row] = g.x;
        b[row + 1] = g.y;
    }

    let c = a.svd(true, true).solve(&b, SVD_EPSILON).ok()?;
    if !c.iter().all(|v| v.is_finite()) {
        return None;
    }

    let mut out = [0.0; 10];
    out.copy_from_slice(c.as_slice());
    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stencil() -> [Point2<f64>; 6] {
        [
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
            Point2::new(-0.4, 0.7),
            Point2::new(0.6, -0.3),
            Point2::new(0.8, 0.9),
        ]
    }

    #[test]
    fn quadratic_round_trip() {
        let points = stencil();
        let exact = [0.3, -1.2, 0.7, 2.0, -0.5, 1.1];
        let values = points.map(|p| {
            quadratic_basis(p.x, p.y)
                .iter()
                .zip(exact)
                .map(|(m, c)| m * c)
                .sum::<f64>()
        });

        let fitted = fit_quadratic_2d(&points, &values).unwrap();
        for (got, want) in fitted.iter().zip(exact) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }

        // Evaluating the fit reproduces every sample
        for (p, v) in points.iter().zip(values) {
            let eval: f64 = quadratic_basis(p.x, p.y)
                .iter()
                .zip(fitted)
                .map(|(m, c)| m * c)
                .sum();
            assert_relative_eq!(eval, v, epsilon = 1e-9);
        }
    }

    #[test]
    fn quadratic_singular_layout_falls_back() {
        // All samples on one line: LU fails, SVD returns a minimum-norm fit
        let points = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0].map(|t| Point2::new(t, 0.0));
        let values = points.map(|p| 2.0 * p.x + 1.0);
        let c = fit_quadratic_2d(&points, &values).unwrap();
        for p in &points {
            let eval: f64 = quadratic_basis(p.x, p.y)
                .iter()
                .zip(c)
                .map(|(m, c)| m * c)
                .sum();
            assert_relative_eq!(eval, 2.0 * p.x + 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn cubic_reproduces_cubic_data() {
        let exact = [0.5, 1.0, -2.0, 0.3, 0.1, -0.7, 0.25, -0.4, 0.6, 0.05];
        let f = |x: f64, y: f64| -> f64 {
            cubic_basis(x, y).iter().zip(exact).map(|(m, c)| m * c).sum()
        };
        let df = |x: f64, y: f64| -> Vector2<f64> {
            let (dx, dy) = cubic_basis_derivatives(x, y);
            Vector2::new(
                dx.iter().zip(exact).map(|(m, c)| m * c).sum(),
                dy.iter().zip(exact).map(|(m, c)| m * c).sum(),
            )
        };

        let points = stencil();
        let values = points.map(|p| f(p.x, p.y));
        let gradients = [0, 1, 2].map(|i| (points[i], df(points[i].x, points[i].y)));

        let c = fit_cubic_2d(&points, &values, &gradients).unwrap();
        for (got, want) in c.iter().zip(exact) {
            assert!((got - want).abs() < 1e-8, "{got} vs {want}");
        }
    }

    #[test]
    fn basis_derivatives_match_finite_differences() {
        let (x, y, h) = (0.3, 0.6, 1e-6);
        let (dx, dy) = cubic_basis_derivatives(x, y);
        let b0 = cubic_basis(x, y);
        let bx = cubic_basis(x + h, y);
        let by = cubic_basis(x, y + h);
        for k in 0..10 {
            assert_relative_eq!((bx[k] - b0[k]) / h, dx[k], epsilon = 1e-5);
            assert_relative_eq!((by[k] - b0[k]) / h, dy[k], epsilon = 1e-5);
        }
    }
}
