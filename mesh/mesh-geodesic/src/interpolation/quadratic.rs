//! Quadratic interpolation through the six-point stencil.

use mesh_types::Vector3;
use tracing::debug;

use super::fit::{fit_quadratic_2d, quadratic_basis};
use super::{stencil_samples, FaceStencil, LocalFrame};

/// Quadratic model `c₀ + c₁x + c₂y + c₃xy + c₄x² + c₅y²`.
///
/// Fitted through the three corners and the three neighbor apexes unfolded
/// into the face plane. On a degenerate face the model reduces to the
/// linear coefficients and its gradient is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticInterpolation {
    coefficients: [f64; 6],
    frame: LocalFrame,
}

impl QuadraticInterpolation {
    /// Build from a stencil.
    #[must_use]
    pub fn new(stencil: &FaceStencil) -> Self {
        let frame = LocalFrame::new(&stencil.corners);
        let [d0, d1, d2] = stencil.values;
        let linear = [d2, d0 - d2, d1 - d2, 0.0, 0.0, 0.0];

        if frame.is_degenerate() {
            debug!(face = ?stencil.face, "degenerate face, quadratic falls back to linear");
            return Self {
                coefficients: linear,
                frame,
            };
        }

        let (points, values) = stencil_samples(&frame, stencil);
        let coefficients = fit_quadratic_2d(&points, &values).unwrap_or_else(|| {
            debug!(face = ?stencil.face, "quadratic fit failed, using linear coefficients");
            linear
        });

        Self {
            coefficients,
            frame,
        }
    }

    /// Fitted coefficients in the order `1, x, y, xy, x², y²`.
    #[must_use]
    pub const fn coefficients(&self) -> &[f64; 6] {
        &self.coefficients
    }

    /// Value at parameter `(x, y)`.
    #[must_use]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        quadratic_basis(x, y)
            .iter()
            .zip(&self.coefficients)
            .map(|(m, c)| m * c)
            .sum()
    }

    /// Surface gradient at parameter `(x, y)`; zero on a degenerate face.
    #[must_use]
    pub fn gradient(&self, x: f64, y: f64) -> Vector3<f64> {
        let [_, c1, c2, c3, c4, c5] = self.coefficients;
        let fx = c3.mul_add(y, (2.0 * c4).mul_add(x, c1));
        let fy = c3.mul_add(x, (2.0 * c5).mul_add(y, c2));
        self.frame.gradient_to_3d(fx, fy)
    }
}
