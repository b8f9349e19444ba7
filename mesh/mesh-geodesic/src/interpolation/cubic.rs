//! Cubic interpolation with vertex gradient constraints.

use mesh_types::{Point2, Vector2, Vector3};
use tracing::debug;

use super::fit::{cubic_basis, cubic_basis_derivatives, fit_cubic_2d};
use super::{stencil_samples, FaceStencil, LocalFrame};

/// Bivariate cubic with 10 coefficients, fitted in the least-squares sense
/// to the six stencil values and the three corner gradients.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicInterpolation {
    coefficients: [f64; 10],
    frame: LocalFrame,
}

impl CubicInterpolation {
    /// Build from a stencil. Uses `stencil.vertex_gradients`.
    #[must_use]
    pub fn new(stencil: &FaceStencil) -> Self {
        let frame = LocalFrame::new(&stencil.corners);
        let [d0, d1, d2] = stencil.values;
        let mut linear = [0.0; 10];
        linear[..3].copy_from_slice(&[d2, d0 - d2, d1 - d2]);

        if frame.is_degenerate() {
            debug!(face = ?stencil.face, "degenerate face, cubic falls back to linear");
            return Self {
                coefficients: linear,
                frame,
            };
        }

        let (points, values) = stencil_samples(&frame, stencil);
        let corners = [
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let gradients = [0, 1, 2].map(|i| {
            let g = stencil.vertex_gradients[i];
            (corners[i], Vector2::new(g.dot(&frame.e0), g.dot(&frame.e1)))
        });

        let coefficients = fit_cubic_2d(&points, &values, &gradients).unwrap_or_else(|| {
            debug!(face = ?stencil.face, "cubic fit failed, using linear coefficients");
            linear
        });

        Self {
            coefficients,
            frame,
        }
    }

    /// Fitted coefficients in the order `1, x, y, x², xy, y², x³, x²y, xy², y³`.
    #[must_use]
    pub const fn coefficients(&self) -> &[f64; 10] {
        &self.coefficients
    }

    /// Value at parameter `(x, y)`.
    #[must_use]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        cubic_basis(x, y)
            .iter()
            .zip(&self.coefficients)
            .map(|(m, c)| m * c)
            .sum()
    }

    /// Surface gradient at parameter `(x, y)`; zero on a degenerate face.
    #[must_use]
    pub fn gradient(&self, x: f64, y: f64) -> Vector3<f64> {
        let (dx, dy) = cubic_basis_derivatives(x, y);
        let fx: f64 = dx.iter().zip(&self.coefficients).map(|(m, c)| m * c).sum();
        let fy: f64 = dy.iter().zip(&self.coefficients).map(|(m, c)| m * c).sum();
        self.frame.gradient_to_3d(fx, fy)
    }
}
