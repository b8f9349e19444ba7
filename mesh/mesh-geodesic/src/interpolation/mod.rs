//! Local models of the distance field over one face.
//!
//! Every model is expressed in the face's barycentric parameter space:
//! `(x, y) = (1, 0)` is corner 0, `(0, 1)` is corner 1 and `(0, 0)` is
//! corner 2, so that `P(x, y) = P₂ + x·(P₀ − P₂) + y·(P₁ − P₂)`.
//!
//! Models are built by the pure function [`TriangularInterpolation::build`]
//! from a [`FaceStencil`]; caching lives in the marching state.

mod cubic;
mod fit;
mod linear;
mod quadratic;

pub use cubic::CubicInterpolation;
pub use fit::fit_quadratic_2d;
pub use linear::LinearInterpolation;
pub use quadratic::QuadraticInterpolation;

use mesh_types::{Point2, Point3, Vector2, Vector3};

use crate::error::GeodesicResult;
use crate::params::InterpolationKind;

/// Tolerance on normalized determinants and edge lengths.
pub(crate) const EPSILON: f64 = 1e-9;

/// Everything a face needs to build any interpolation model.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceStencil {
    /// Face index, for error reporting.
    pub face: Option<u32>,
    /// Corner positions `P₀, P₁, P₂`.
    pub corners: [Point3<f64>; 3],
    /// Distance values at the corners. Must be finite.
    pub values: [f64; 3],
    /// For each corner `i`, the apex of the neighbor face across the edge
    /// opposite `i` and its distance, when that neighbor exists and was
    /// reached.
    pub apexes: [Option<(Point3<f64>, f64)>; 3],
    /// Per-corner gradient estimates (used by the cubic model only).
    pub vertex_gradients: [Vector3<f64>; 3],
}

impl FaceStencil {
    /// Stencil for an isolated face with no neighbor information.
    #[must_use]
    pub fn isolated(corners: [Point3<f64>; 3], values: [f64; 3]) -> Self {
        Self {
            face: None,
            corners,
            values,
            apexes: [None; 3],
            vertex_gradients: [Vector3::zeros(); 3],
        }
    }
}

/// A built model of the distance field over one face.
#[derive(Debug, Clone, PartialEq)]
pub enum TriangularInterpolation {
    /// Barycentric interpolation of the corner values.
    Linear(LinearInterpolation),
    /// Quadratic through corners and neighbor apexes.
    Quadratic(QuadraticInterpolation),
    /// Least-squares cubic with vertex gradient constraints.
    Cubic(CubicInterpolation),
}

impl TriangularInterpolation {
    /// Build a model of the requested kind.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_geodesic::{FaceStencil, InterpolationKind, TriangularInterpolation};
    /// use mesh_types::Point3;
    ///
    /// let stencil = FaceStencil::isolated(
    ///     [Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0), Point3::origin()],
    ///     [1.0, 1.0, 0.0],
    /// );
    /// let model = TriangularInterpolation::build(InterpolationKind::Linear, &stencil);
    /// assert!((model.value(1.0, 0.0) - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn build(kind: InterpolationKind, stencil: &FaceStencil) -> Self {
        match kind {
            InterpolationKind::Linear => Self::Linear(LinearInterpolation::new(stencil)),
            InterpolationKind::Quadratic => Self::Quadratic(QuadraticInterpolation::new(stencil)),
            InterpolationKind::Cubic => Self::Cubic(CubicInterpolation::new(stencil)),
        }
    }

    /// Which model this is.
    #[must_use]
    pub const fn kind(&self) -> InterpolationKind {
        match self {
            Self::Linear(_) => InterpolationKind::Linear,
            Self::Quadratic(_) => InterpolationKind::Quadratic,
            Self::Cubic(_) => InterpolationKind::Cubic,
        }
    }

    /// Interpolated distance at parameter `(x, y)`.
    #[must_use]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Linear(m) => m.value(x, y),
            Self::Quadratic(m) => m.value(x, y),
            Self::Cubic(m) => m.value(x, y),
        }
    }

    /// Surface gradient of the distance at parameter `(x, y)`, in 3D.
    ///
    /// # Errors
    ///
    /// The linear model returns [`GeodesicError::DegenerateGeometry`] on a
    /// degenerate face. The quadratic and cubic models return a zero
    /// gradient instead.
    ///
    /// [`GeodesicError::DegenerateGeometry`]: crate::GeodesicError::DegenerateGeometry
    pub fn gradient(&self, x: f64, y: f64) -> GeodesicResult<Vector3<f64>> {
        match self {
            Self::Linear(m) => m.gradient(),
            Self::Quadratic(m) => Ok(m.gradient(x, y)),
            Self::Cubic(m) => Ok(m.gradient(x, y)),
        }
    }
}

/// Flattening of a face into 2D, and the passage matrix
/// `J = [q₀ q₁]` from parameter space to that plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LocalFrame {
    pub(crate) e0: Vector3<f64>,
    pub(crate) e1: Vector3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    q0: Vector2<f64>,
    q1: Vector2<f64>,
    det: f64,
    degenerate: bool,
}

impl LocalFrame {
    pub(crate) fn new(corners: &[Point3<f64>; 3]) -> Self {
        let e0 = corners[0] - corners[2];
        let e1 = corners[1] - corners[2];
        let len0 = e0.norm();
        let len1 = e1.norm();

        let u = if len0 > EPSILON { e0 / len0 } else { Vector3::x() };
        let along = e1.dot(&u);
        let perp = e1 - u * along;
        let perp_len = perp.norm();
        let v = if perp_len > EPSILON * len1.max(1.0) {
            perp / perp_len
        } else {
            any_orthogonal(&u)
        };

        let q0 = Vector2::new(len0, 0.0);
        let q1 = Vector2::new(along, e1.dot(&v));
        let det = q0.x.mul_add(q1.y, -(q1.x * q0.y));

        let degenerate = len0 <= EPSILON || len1 <= EPSILON || {
            let cos = e0.dot(&e1) / (len0 * len1);
            cos.mul_add(-cos, 1.0) <= EPSILON
        };

        Self {
            e0,
            e1,
            u,
            v,
            q0,
            q1,
            det,
            degenerate,
        }
    }

    /// Whether the face is too thin for a stable parameterization.
    pub(crate) const fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// 2D position of corner `i` in the face plane.
    pub(crate) fn corner_2d(&self, i: usize) -> Vector2<f64> {
        match i {
            0 => self.q0,
            1 => self.q1,
            _ => Vector2::zeros(),
        }
    }

    /// Parameter coordinates of a point given in the face plane.
    pub(crate) fn to_parameters(&self, q: &Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.q1.y.mul_add(q.x, -(self.q1.x * q.y)) / self.det,
            self.q0.x.mul_add(q.y, -(self.q0.y * q.x)) / self.det,
        )
    }

    /// Unfold the apex across the edge opposite `corner` into the face
    /// plane, given its distances to the two edge endpoints, and return
    /// its parameter coordinates.
    pub(crate) fn unfold_apex(
        &self,
        corners: &[Point3<f64>; 3],
        corner: usize,
        apex: &Point3<f64>,
    ) -> Option<Vector2<f64>> {
        let j = (corner + 1) % 3;
        let k = (corner + 2) % 3;
        let qj = self.corner_2d(j);
        let qk = self.corner_2d(k);
        let edge = qk - qj;
        let length = edge.norm();
        if length <= EPSILON {
            return None;
        }

        let ra = (apex - corners[j]).norm();
        let rb = (apex - corners[k]).norm();
        let s = (ra.mul_add(ra, -(rb * rb)) + length * length) / (2.0 * length);
        let h = s.mul_add(-s, ra * ra).max(0.0).sqrt();

        let dir = edge / length;
        let mut normal = Vector2::new(-dir.y, dir.x);
        if normal.dot(&(self.corner_2d(corner) - qj)) > 0.0 {
            normal = -normal;
        }

        let q = qj + dir * s + normal * h;
        let params = self.to_parameters(&q);
        (params.x.is_finite() && params.y.is_finite()).then_some(params)
    }

    /// Convert a parameter-space gradient `(∂f/∂x, ∂f/∂y)` to a 3D vector
    /// in the face plane. Zero when `|det J| ≤ EPSILON`.
    pub(crate) fn gradient_to_3d(&self, fx: f64, fy: f64) -> Vector3<f64> {
        if self.degenerate || self.det.abs() <= EPSILON {
            return Vector3::zeros();
        }
        let gx = self.q1.y.mul_add(fx, -(self.q0.y * fy)) / self.det;
        let gy = self.q0.x.mul_add(fy, -(self.q1.x * fx)) / self.det;
        self.u * gx + self.v * gy
    }
}

/// Parameter coordinates and values of the six stencil points: the three
/// corners followed by the three apexes (or edge midpoints).
pub(crate) fn stencil_samples(
    frame: &LocalFrame,
    stencil: &FaceStencil,
) -> ([Point2<f64>; 6], [f64; 6]) {
    const CORNERS: [(f64, f64); 3] = [(1.0, 0.0), (0.0, 1.0), (0.0, 0.0)];

    let mut points = [Point2::origin(); 6];
    let mut values = [0.0; 6];
    for i in 0..3 {
        points[i] = Point2::new(CORNERS[i].0, CORNERS[i].1);
        values[i] = stencil.values[i];
    }

    for i in 0..3 {
        let j = (i + 1) % 3;
        let k = (i + 2) % 3;
        let unfolded = stencil.apexes[i].and_then(|(apex, value)| {
            frame
                .unfold_apex(&stencil.corners, i, &apex)
                .map(|p| (p, value))
        });
        let (p, value) = unfolded.unwrap_or_else(|| {
            let mid = Vector2::new(
                0.5 * (CORNERS[j].0 + CORNERS[k].0),
                0.5 * (CORNERS[j].1 + CORNERS[k].1),
            );
            (mid, 0.5 * (stencil.values[j] + stencil.values[k]))
        });
        points[3 + i] = Point2::new(p.x, p.y);
        values[3 + i] = value;
    }

    (points, values)
}

fn any_orthogonal(u: &Vector3<f64>) -> Vector3<f64> {
    let helper = if u.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let w = u.cross(&helper);
    let n = w.norm();
    if n > EPSILON { w / n } else { Vector3::y() }
}
